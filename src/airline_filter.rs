//! Client-side airline multiselect over the rendered results

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::airlines;

/// Airline code to display name, for exactly the airlines of the latest render
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AirlineDictionary(BTreeMap<String, String>);

impl AirlineDictionary {
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            codes
                .into_iter()
                .filter(|code| !code.is_empty())
                .map(|code| (code.to_string(), airlines::display_name(code)))
                .collect(),
        )
    }

    pub fn name<'a>(&'a self, code: &'a str) -> &'a str {
        self.0.get(code).map(String::as_str).unwrap_or(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AirlineOption {
    pub code: String,
    pub name: String,
}

/// How the options were rebuilt after a render
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rebuild {
    /// Nothing carried over, everything selected
    Fresh,
    /// Previous selection restored where the airline is still present
    Continuation,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AirlineFilter {
    /// Sorted by display name
    pub options: Vec<AirlineOption>,
    pub selected: BTreeSet<String>,
}

impl AirlineFilter {
    /// Replace the options with the airlines of a new render.
    ///
    /// The render continues the previous one when every previous option is
    /// still present; otherwise the selection starts over with all airlines.
    pub fn rebuild(&mut self, dictionary: &AirlineDictionary) -> Rebuild {
        let previous: BTreeSet<String> = self.options.drain(..).map(|o| o.code).collect();
        let continuation =
            !previous.is_empty() && previous.iter().all(|code| dictionary.contains(code));

        let mut options: Vec<AirlineOption> = dictionary
            .codes()
            .map(|code| AirlineOption {
                code: code.to_string(),
                name: dictionary.name(code).to_string(),
            })
            .collect();
        options.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        self.options = options;

        if continuation {
            let kept = std::mem::take(&mut self.selected);
            self.selected = dictionary
                .codes()
                .filter(|code| kept.contains(*code) || !previous.contains(*code))
                .map(str::to_string)
                .collect();
            Rebuild::Continuation
        } else {
            self.select_all();
            Rebuild::Fresh
        }
    }

    /// A flight shows only when every airline it flies is selected
    pub fn is_visible(&self, airlines: &BTreeSet<String>) -> bool {
        airlines.iter().all(|code| self.selected.contains(code))
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    /// Toggle the option at `index`. Returns whether it existed.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(option) = self.options.get(index) else {
            return false;
        };
        if !self.selected.remove(&option.code) {
            self.selected.insert(option.code.clone());
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selected = self.options.iter().map(|o| o.code.clone()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn all_selected(&self) -> bool {
        self.options.iter().all(|o| self.selected.contains(&o.code))
    }

    /// `All airlines`, `3 of 5 airlines`, ...
    pub fn summary(&self) -> String {
        if self.options.is_empty() {
            "No airlines".to_string()
        } else if self.all_selected() {
            "All airlines".to_string()
        } else {
            format!("{} of {} airlines", self.selected.len(), self.options.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn filter_for(codes: &[&str]) -> AirlineFilter {
        let mut filter = AirlineFilter::default();
        filter.rebuild(&AirlineDictionary::from_codes(codes.iter().copied()));
        filter
    }

    #[test]
    fn test_first_rebuild_selects_all() {
        let mut filter = AirlineFilter::default();
        let dictionary = AirlineDictionary::from_codes(["FR", "W6", "ZZ"]);
        assert_eq!(filter.rebuild(&dictionary), Rebuild::Fresh);
        assert_eq!(filter.selected, set(&["FR", "W6", "ZZ"]));
        // Unknown codes stay selectable under their code
        assert!(filter.options.iter().any(|o| o.code == "ZZ" && o.name == "ZZ"));
        assert_eq!(filter.options[0].name, "Ryanair");
    }

    #[test]
    fn test_continuation_restores_selection() {
        let mut filter = filter_for(&["FR", "W6"]);
        filter.selected.remove("W6");

        let superset = AirlineDictionary::from_codes(["FR", "W6", "U2"]);
        assert_eq!(filter.rebuild(&superset), Rebuild::Continuation);
        assert_eq!(filter.selected, set(&["FR", "U2"]));
    }

    #[test]
    fn test_missing_previous_airline_starts_fresh() {
        let mut filter = filter_for(&["FR", "W6"]);
        filter.deselect_all();

        let other = AirlineDictionary::from_codes(["FR", "U2"]);
        assert_eq!(filter.rebuild(&other), Rebuild::Fresh);
        assert_eq!(filter.selected, set(&["FR", "U2"]));
    }

    #[test]
    fn test_visibility_requires_every_airline() {
        let mut filter = filter_for(&["FR", "W6", "U2"]);
        let mixed = set(&["FR", "W6"]);
        assert!(filter.is_visible(&mixed));

        let w6 = filter.options.iter().position(|o| o.code == "W6").unwrap();
        assert!(filter.toggle(w6));
        assert!(!filter.is_visible(&mixed));
        assert!(filter.is_visible(&set(&["FR"])));
        assert!(!filter.toggle(99));
    }

    #[test]
    fn test_visibility_is_monotonic_in_selection() {
        let flights = [set(&["FR"]), set(&["FR", "W6"]), set(&["U2"]), set(&["W6", "U2"])];
        let mut filter = filter_for(&["FR", "W6", "U2"]);
        filter.deselect_all();

        let mut visible = 0;
        for index in 0..filter.options.len() {
            filter.toggle(index);
            let now = flights.iter().filter(|f| filter.is_visible(f)).count();
            assert!(now >= visible);
            visible = now;
        }
        assert_eq!(visible, flights.len());
    }

    #[test]
    fn test_select_all_shows_everything() {
        let mut filter = filter_for(&["FR", "W6"]);
        filter.deselect_all();
        assert!(!filter.is_visible(&set(&["FR"])));
        assert_eq!(filter.summary(), "0 of 2 airlines");

        filter.select_all();
        assert!(filter.is_visible(&set(&["FR", "W6"])));
        assert_eq!(filter.summary(), "All airlines");
    }
}
