//! Display records built from a search response

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::airline_filter::AirlineDictionary;
use crate::compare::ComparisonLink;
use crate::currency::CurrencySymbols;
use crate::itinerary;
use crate::state::{Flight, SearchResponse};

pub const SEARCH_ERROR_MESSAGE: &str = "An error occurred while fetching flights. Please try again.";
pub const NO_FLIGHTS_MESSAGE: &str = "No flights found. Please try a different search.";
pub const NO_FILTERED_FLIGHTS_MESSAGE: &str =
    "No flights found for the selected airlines. Please try a different selection.";

/// One rendered flight
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultEntry {
    pub flight: Flight,
    /// Every airline flown, outbound and inbound
    pub airlines: BTreeSet<String>,
    pub collapse_id: String,
    pub comparison_link: Option<String>,
    pub expanded: bool,
}

impl ResultEntry {
    pub fn new(flight: Flight, comparison: &dyn ComparisonLink) -> Self {
        let airlines = flight
            .route
            .iter()
            .map(|leg| leg.airline.clone())
            .filter(|code| !code.is_empty())
            .collect();
        let collapse_id = itinerary::collapse_id(&flight.booking_token);
        let comparison_link = comparison.link(&flight.route);
        Self {
            flight,
            airlines,
            collapse_id,
            comparison_link,
            expanded: false,
        }
    }
}

/// Everything the results pane shows for one successful search
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResults {
    pub currency: String,
    pub currency_symbol: String,
    pub entries: Vec<ResultEntry>,
    pub dictionary: AirlineDictionary,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formatted price of the first (top-sorted) flight
    pub fn lead_price(&self) -> Option<String> {
        self.entries
            .first()
            .map(|entry| itinerary::format_price(entry.flight.price))
    }
}

pub fn render_results(
    response: SearchResponse,
    symbols: &CurrencySymbols,
    comparison: &dyn ComparisonLink,
) -> SearchResults {
    let currency_symbol = symbols.symbol(&response.currency).to_string();
    let entries: Vec<ResultEntry> = response
        .flights
        .into_iter()
        .map(|flight| ResultEntry::new(flight, comparison))
        .collect();
    let dictionary = AirlineDictionary::from_codes(
        entries
            .iter()
            .flat_map(|entry| entry.airlines.iter().map(String::as_str)),
    );
    SearchResults {
        currency: response.currency,
        currency_symbol,
        entries,
        dictionary,
    }
}
