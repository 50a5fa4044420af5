//! Search criteria collected from the form, and their query encoding

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::baggage::{self, BagSplit, MAX_CABIN_PER_PASSENGER, MAX_CHECKED_PER_PASSENGER};
use crate::dates::{DateRange, format_api_date};
use crate::form::{Cabin, Connections, DepartTime, FlightType, SearchForm, SortOrder, Stops};

pub const DEFAULT_LIMIT: u32 = 100;
/// Longest accepted connection, hours
pub const DEFAULT_LAYOVER_HOURS: u32 = 48;

/// Bag counts per passenger, comma separated
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Baggage {
    pub adult_hand: String,
    pub adult_hold: String,
    /// Absent without children
    pub child_hand: Option<String>,
    pub child_hold: Option<String>,
}

impl Baggage {
    fn distribute(adults: u32, children: u32, cabin_bags: u32, checked_bags: u32) -> Self {
        let split = BagSplit::new(adults, cabin_bags, checked_bags);
        let for_children =
            |bags, max| (children > 0).then(|| baggage::format_bag_data(children, bags, max));
        Self {
            adult_hand: baggage::format_bag_data(
                adults,
                split.adult_cabin,
                MAX_CABIN_PER_PASSENGER,
            ),
            adult_hold: baggage::format_bag_data(
                adults,
                split.adult_checked,
                MAX_CHECKED_PER_PASSENGER,
            ),
            child_hand: for_children(split.child_cabin, MAX_CABIN_PER_PASSENGER),
            child_hold: for_children(split.child_checked, MAX_CHECKED_PER_PASSENGER),
        }
    }
}

/// One submission's worth of search parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchCriteria {
    pub fly_from: String,
    pub fly_to: String,
    pub departure: DateRange,
    /// Only for round trips
    pub return_dates: Option<DateRange>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub cabin: Cabin,
    pub currency: String,
    /// Raw text; empty when unset or not a number
    pub budget: String,
    pub limit: u32,
    pub sort: SortOrder,
    pub stops: Stops,
    pub max_duration: String,
    pub layover_hours: u32,
    pub depart_time: DepartTime,
    pub connections: Connections,
    pub flight_type: FlightType,
    pub baggage: Baggage,
}

fn numeric_or_empty(text: &str) -> String {
    let text = text.trim();
    match text.parse::<u32>() {
        Ok(_) => text.to_string(),
        Err(_) => String::new(),
    }
}

fn parse_or(text: &str, default: u32) -> u32 {
    text.trim().parse().unwrap_or(default)
}

impl SearchCriteria {
    /// Read the form. `country` stands in for an empty origin.
    pub fn collect(form: &SearchForm, country: Option<&str>) -> Self {
        let fly_from = match form.from.trim() {
            "" => country.unwrap_or_default().trim().to_string(),
            from => from.to_string(),
        };
        let adults = form.adults.max(1);
        let return_dates =
            (form.flight_type == FlightType::Return).then_some(form.return_dates.range);
        let currency = match form.currency.trim() {
            "" => crate::currency::BASE_CURRENCY.to_string(),
            code => code.to_string(),
        };

        Self {
            fly_from,
            fly_to: form.to.trim().to_string(),
            departure: form.departure.range,
            return_dates,
            adults,
            children: form.children,
            infants: form.infants,
            cabin: form.cabin,
            currency,
            budget: numeric_or_empty(&form.budget),
            limit: parse_or(&form.limit, DEFAULT_LIMIT),
            sort: form.sort,
            stops: form.stops,
            max_duration: numeric_or_empty(&form.max_duration),
            layover_hours: parse_or(&form.layover, DEFAULT_LAYOVER_HOURS),
            depart_time: form.depart_time,
            connections: form.connections,
            flight_type: form.flight_type,
            baggage: Baggage::distribute(
                adults,
                form.children,
                form.cabin_bags,
                form.checked_bags,
            ),
        }
    }

    /// Query parameters in the provider's field names
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let (dtime_from, dtime_to) = self.depart_time.window();
        let mut query = vec![
            ("fly_from", self.fly_from.clone()),
            ("fly_to", self.fly_to.clone()),
            ("date_from", format_api_date(self.departure.start)),
            ("date_to", format_api_date(self.departure.end)),
            ("adults", self.adults.to_string()),
            ("children", self.children.to_string()),
            ("infants", self.infants.to_string()),
            ("selected_cabins", self.cabin.code().to_string()),
            ("curr", self.currency.clone()),
            ("price_to", self.budget.clone()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.param().to_string()),
            ("max_stopovers", self.stops.param().to_string()),
            ("max_fly_duration", self.max_duration.clone()),
            ("stopover_from", "00:00".to_string()),
            ("stopover_to", format!("{}:00", self.layover_hours)),
            ("ret_from_diff_city", "false".to_string()),
            ("ret_to_diff_city", "false".to_string()),
            ("dtime_from", dtime_from.to_string()),
            ("dtime_to", dtime_to.to_string()),
            ("enable_vi", self.connections.param().to_string()),
            ("flight_type", self.flight_type.param().to_string()),
            ("adult_hand_bag", self.baggage.adult_hand.clone()),
            ("adult_hold_bag", self.baggage.adult_hold.clone()),
        ];
        if let Some(bags) = &self.baggage.child_hand {
            query.push(("child_hand_bag", bags.clone()));
        }
        if let Some(bags) = &self.baggage.child_hold {
            query.push(("child_hold_bag", bags.clone()));
        }
        if let Some(range) = &self.return_dates {
            query.push(("return_from", format_api_date(range.start)));
            query.push(("return_to", format_api_date(range.end)));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::default_offered;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn form() -> SearchForm {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        SearchForm::new(today, "EUR".into(), default_offered())
    }

    fn value<'a>(query: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_defaults() {
        let mut form = form();
        form.to = "BCN".into();
        let criteria = SearchCriteria::collect(&form, Some("GB"));
        let query = criteria.to_query();

        assert_eq!(value(&query, "fly_from"), Some("GB"));
        assert_eq!(value(&query, "fly_to"), Some("BCN"));
        assert_eq!(value(&query, "date_from"), Some("19/10/2026"));
        assert_eq!(value(&query, "date_to"), Some("17/11/2026"));
        assert_eq!(value(&query, "adults"), Some("1"));
        assert_eq!(value(&query, "selected_cabins"), Some("M"));
        assert_eq!(value(&query, "curr"), Some("EUR"));
        assert_eq!(value(&query, "price_to"), Some(""));
        assert_eq!(value(&query, "limit"), Some("100"));
        assert_eq!(value(&query, "sort"), Some("price"));
        assert_eq!(value(&query, "stopover_from"), Some("00:00"));
        assert_eq!(value(&query, "stopover_to"), Some("48:00"));
        assert_eq!(value(&query, "ret_from_diff_city"), Some("false"));
        assert_eq!(value(&query, "flight_type"), Some("round"));
        assert_eq!(value(&query, "return_from"), Some("18/11/2026"));
        assert_eq!(value(&query, "adult_hand_bag"), Some("0"));
        assert_eq!(value(&query, "child_hand_bag"), None);
    }

    #[test]
    fn test_one_way_omits_return_dates() {
        let mut form = form();
        form.flight_type = FlightType::OneWay;
        let query = SearchCriteria::collect(&form, None).to_query();
        assert_eq!(value(&query, "flight_type"), Some("oneway"));
        assert_eq!(value(&query, "return_from"), None);
        assert_eq!(value(&query, "return_to"), None);
        assert_eq!(value(&query, "fly_from"), Some(""));
    }

    #[test]
    fn test_bags_split_between_adults_and_children() {
        let mut form = form();
        form.adults = 2;
        form.children = 1;
        form.cabin_bags = 3;
        form.checked_bags = 5;
        let query = SearchCriteria::collect(&form, None).to_query();

        assert_eq!(value(&query, "adult_hand_bag"), Some("1,1"));
        assert_eq!(value(&query, "adult_hold_bag"), Some("2,2"));
        assert_eq!(value(&query, "child_hand_bag"), Some("1"));
        assert_eq!(value(&query, "child_hold_bag"), Some("1"));
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let mut form = form();
        form.limit = "lots".into();
        form.layover = "".into();
        form.budget = "300".into();
        form.max_duration = "ten".into();
        form.depart_time = DepartTime::Evening;
        form.stops = Stops::Direct;
        form.connections = Connections::SelfTransfer;
        let query = SearchCriteria::collect(&form, None).to_query();

        assert_eq!(value(&query, "limit"), Some("100"));
        assert_eq!(value(&query, "stopover_to"), Some("48:00"));
        assert_eq!(value(&query, "price_to"), Some("300"));
        assert_eq!(value(&query, "max_fly_duration"), Some(""));
        assert_eq!(value(&query, "dtime_from"), Some("18:00"));
        assert_eq!(value(&query, "dtime_to"), Some("23:59"));
        assert_eq!(value(&query, "max_stopovers"), Some("0"));
        assert_eq!(value(&query, "enable_vi"), Some("true"));
    }
}
