//! Application state - single source of truth

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::airline_filter::AirlineFilter;
use crate::compare::ComparisonProvider;
use crate::currency;
use crate::form::{FormField, SearchForm};
use crate::logos::LogoState;
use crate::results::SearchResults;

/// One flight segment of an itinerary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteLeg {
    pub airline: String,
    pub flight_no: String,
    pub fly_from: String,
    pub fly_to: String,
    pub city_from: String,
    pub city_to: String,
    /// Wall-clock time at the departure airport
    pub local_departure: NaiveDateTime,
    pub utc_departure: DateTime<Utc>,
    /// Wall-clock time at the arrival airport
    pub local_arrival: NaiveDateTime,
    pub utc_arrival: DateTime<Utc>,
    /// Leg belongs to the inbound half of a round trip
    pub is_return: bool,
}

/// A priced itinerary as returned by the provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Flight {
    pub price: f64,
    pub booking_token: String,
    pub deep_link: String,
    pub route: Vec<RouteLeg>,
}

/// Body of a successful search
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub currency: String,
    pub flights: Vec<Flight>,
}

/// Which pane receives keyboard input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Form,
    Results,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Focus::Form => Focus::Results,
            Focus::Results => Focus::Form,
        }
    }
}

/// Last known terminal size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 120,
            height: 32,
        }
    }
}

/// Below this width the form and the results share the screen one at a time.
pub const MOBILE_BREAKPOINT: u16 = 100;
/// Width of the form column in the side-by-side layout.
pub const FORM_PANEL_WIDTH: u16 = 46;
/// Rows taken by a collapsed round-trip entry, separator included.
pub const ENTRY_ROWS: u16 = 3;
/// Spinner speed while a search is in flight.
pub const LOADING_TICK_MS: u64 = 80;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Search ---
    /// Reference date for the pickers' quick-ranges
    #[debug(section = "Search", label = "Today", debug_fmt)]
    pub today: NaiveDate,

    /// Every input control of the search form
    #[debug(section = "Search", label = "Form", debug_fmt)]
    pub form: SearchForm,

    /// Id of the latest submitted search; older responses are dropped
    #[debug(section = "Search", label = "Sequence")]
    pub search_seq: u64,

    /// Results lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Results", label = "Data", debug_fmt)]
    pub results: DataResource<SearchResults>,

    /// Airline multiselect
    #[debug(section = "Results", label = "Airline filter", debug_fmt)]
    pub filter: AirlineFilter,

    /// Outcome of the last generated-page notification
    #[debug(section = "Results", label = "Page notify", debug_fmt)]
    pub last_notify: Option<String>,

    // --- Settings ---
    /// Detected country code, used for the origin fallback
    #[debug(section = "Settings", label = "Country", debug_fmt)]
    pub country: Option<String>,

    #[debug(section = "Settings", label = "Comparison", debug_fmt)]
    pub comparison: ComparisonProvider,

    /// Post a generated-page notification after each successful search
    #[debug(section = "Settings", label = "Notify pages")]
    pub notify_pages: bool,

    // --- UI internals (skipped) ---
    #[debug(skip)]
    pub focus: Focus,

    /// Index into the form's visible fields
    #[debug(skip)]
    pub form_cursor: usize,

    /// Index into the currently visible (filtered) entries
    #[debug(skip)]
    pub selected: usize,

    /// First visible entry of the results list
    #[debug(skip)]
    pub scroll_offset: usize,

    #[debug(skip)]
    pub filter_open: bool,

    #[debug(skip)]
    pub filter_cursor: usize,

    /// Airline logos, kept for the life of the process
    #[debug(skip)]
    pub logos: BTreeMap<String, LogoState>,

    #[debug(skip)]
    pub viewport: Viewport,

    /// Spinner frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new(today: NaiveDate, form: SearchForm) -> Self {
        Self {
            today,
            form,
            search_seq: 0,
            results: DataResource::Empty,
            filter: AirlineFilter::default(),
            last_notify: None,
            country: None,
            comparison: ComparisonProvider::default(),
            notify_pages: false,
            focus: Focus::Form,
            form_cursor: 0,
            selected: 0,
            scroll_offset: 0,
            filter_open: false,
            filter_cursor: 0,
            logos: BTreeMap::new(),
            viewport: Viewport::default(),
            tick_count: 0,
        }
    }

    /// Narrow terminals show one pane at a time
    pub fn is_mobile(&self) -> bool {
        self.viewport.width < MOBILE_BREAKPOINT
    }

    /// Indices of the loaded entries that pass the airline filter
    pub fn visible_entries(&self) -> Vec<usize> {
        match self.results.data() {
            Some(results) => results
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| self.filter.is_visible(&entry.airlines))
                .map(|(index, _)| index)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Entries that fit in the results pane, estimated from the terminal height
    pub fn results_page(&self) -> usize {
        // Block borders and the status bar. Both layouts give the results the
        // full height.
        let height = self.viewport.height.saturating_sub(3);
        usize::from((height / ENTRY_ROWS).max(1))
    }

    pub fn is_searching(&self) -> bool {
        self.results.is_loading()
    }

    /// Field under the form cursor
    pub fn current_field(&self) -> Option<FormField> {
        self.form.visible_fields().get(self.form_cursor).copied()
    }

    /// The visible entry under the selection, as an index into all entries
    pub fn selected_entry(&self) -> Option<usize> {
        self.visible_entries().get(self.selected).copied()
    }
}

impl Default for AppState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        let offered = currency::default_offered();
        let currency = currency::currency_for_country(None, &offered);
        Self::new(today, SearchForm::new(today, currency, offered))
    }
}
