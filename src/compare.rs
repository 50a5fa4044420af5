//! Links that reopen an itinerary on a price-comparison site

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::RouteLeg;

/// Builds a comparison URL for one itinerary
pub trait ComparisonLink: Send + Sync {
    /// `None` when no link can be built for this route
    fn link(&self, route: &[RouteLeg]) -> Option<String>;
}

const GOOGLE_FLIGHTS_URL: &str = "https://www.google.com/travel/flights/search";
const TFS_PREFIX: &str = "CBwQAhoeEgo";
const TFS_RETURN_PREFIX: &str = "Gh4SCg";
const TFS_ROUND_TRIP_SUFFIX: &str = "QAFIAXABggELCP___________wGYAQE";
const TFS_ONE_WAY_SUFFIX: &str = "QAFIAXABggELCP___________wGYAQA";

/// Google Flights search prefilled with the itinerary's airports and dates.
///
/// Best effort: the `tfs` token mimics what the site produces for a simple
/// search and may drift from the real format.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoogleFlights;

impl GoogleFlights {
    fn encode_direction(legs: &[&RouteLeg]) -> Option<String> {
        let first = legs.first()?;
        let last = legs.last()?;
        let raw = format!(
            "{}{}{}",
            first.local_departure.format("%Y-%m-%d"),
            first.fly_from,
            last.fly_to
        );
        Some(STANDARD_NO_PAD.encode(raw))
    }
}

impl ComparisonLink for GoogleFlights {
    fn link(&self, route: &[RouteLeg]) -> Option<String> {
        let (inbound, outbound): (Vec<&RouteLeg>, Vec<&RouteLeg>) =
            route.iter().partition(|leg| leg.is_return);

        let mut tfs = String::from(TFS_PREFIX);
        tfs.push_str(&Self::encode_direction(&outbound)?);
        match Self::encode_direction(&inbound) {
            Some(encoded) => {
                tfs.push_str(TFS_RETURN_PREFIX);
                tfs.push_str(&encoded);
                tfs.push_str(TFS_ROUND_TRIP_SUFFIX);
            }
            None => tfs.push_str(TFS_ONE_WAY_SUFFIX),
        }
        Some(format!("{GOOGLE_FLIGHTS_URL}?tfs={tfs}"))
    }
}

/// Never produces a link
#[derive(Clone, Copy, Debug, Default)]
pub struct Disabled;

impl ComparisonLink for Disabled {
    fn link(&self, _route: &[RouteLeg]) -> Option<String> {
        None
    }
}

/// Which comparison site entries link to
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonProvider {
    #[default]
    GoogleFlights,
    Disabled,
}

impl ComparisonProvider {
    pub fn builder(&self) -> &'static dyn ComparisonLink {
        match self {
            ComparisonProvider::GoogleFlights => &GoogleFlights,
            ComparisonProvider::Disabled => &Disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn leg(from: &str, to: &str, day: u32, is_return: bool) -> RouteLeg {
        let local = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        RouteLeg {
            airline: "FR".into(),
            flight_no: "1234".into(),
            fly_from: from.into(),
            fly_to: to.into(),
            city_from: from.into(),
            city_to: to.into(),
            local_departure: local,
            utc_departure: Utc.from_utc_datetime(&local),
            local_arrival: local,
            utc_arrival: Utc.from_utc_datetime(&local),
            is_return,
        }
    }

    #[test]
    fn test_one_way_link() {
        let route = vec![leg("LHR", "DUB", 1, false), leg("DUB", "JFK", 1, false)];
        let link = GoogleFlights.link(&route).unwrap();
        // "2024-05-01LHRJFK"
        assert_eq!(
            link,
            format!(
                "{GOOGLE_FLIGHTS_URL}?tfs=CBwQAhoeEgoMjAyNC0wNS0wMUxIUkpGSw{TFS_ONE_WAY_SUFFIX}"
            )
        );
    }

    #[test]
    fn test_round_trip_link_encodes_both_directions() {
        let route = vec![leg("LHR", "JFK", 1, false), leg("JFK", "LHR", 9, true)];
        let link = GoogleFlights.link(&route).unwrap();
        let inbound = STANDARD_NO_PAD.encode("2024-05-09JFKLHR");
        assert!(link.contains(&format!("{TFS_RETURN_PREFIX}{inbound}")));
        assert!(link.ends_with(TFS_ROUND_TRIP_SUFFIX));
        assert_eq!(link.matches('=').count(), 1);
    }

    #[test]
    fn test_disabled_and_empty_routes() {
        let route = vec![leg("LHR", "JFK", 1, false)];
        assert_eq!(ComparisonProvider::Disabled.builder().link(&route), None);
        assert_eq!(GoogleFlights.link(&[]), None);
    }
}
