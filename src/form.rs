//! Search form controls: typed choices, text inputs, steppers and date pickers

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::baggage::{self, BagLimits};
use crate::dates::{DatePicker, PickerKind};

/// A closed set of options shown by a select control
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn cycle(self, step: i8) -> Self {
        let len = Self::ALL.len() as i64;
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as i64;
        let next = (index + i64::from(step)).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FlightType {
    #[default]
    Return,
    OneWay,
}

impl FlightType {
    /// Value of the `flight_type` query parameter
    pub fn param(&self) -> &'static str {
        match self {
            FlightType::Return => "round",
            FlightType::OneWay => "oneway",
        }
    }
}

impl Choice for FlightType {
    const ALL: &'static [Self] = &[FlightType::Return, FlightType::OneWay];

    fn label(&self) -> &'static str {
        match self {
            FlightType::Return => "Return",
            FlightType::OneWay => "One-way",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Cabin {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl Cabin {
    pub fn code(&self) -> &'static str {
        match self {
            Cabin::Economy => "M",
            Cabin::PremiumEconomy => "W",
            Cabin::Business => "C",
            Cabin::First => "F",
        }
    }
}

impl Choice for Cabin {
    const ALL: &'static [Self] = &[
        Cabin::Economy,
        Cabin::PremiumEconomy,
        Cabin::Business,
        Cabin::First,
    ];

    fn label(&self) -> &'static str {
        match self {
            Cabin::Economy => "Economy",
            Cabin::PremiumEconomy => "Premium economy",
            Cabin::Business => "Business",
            Cabin::First => "First",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortOrder {
    #[default]
    Price,
    Duration,
    Quality,
    Date,
}

impl SortOrder {
    pub fn param(&self) -> &'static str {
        match self {
            SortOrder::Price => "price",
            SortOrder::Duration => "duration",
            SortOrder::Quality => "quality",
            SortOrder::Date => "date",
        }
    }
}

impl Choice for SortOrder {
    const ALL: &'static [Self] = &[
        SortOrder::Price,
        SortOrder::Duration,
        SortOrder::Quality,
        SortOrder::Date,
    ];

    fn label(&self) -> &'static str {
        match self {
            SortOrder::Price => "Cheapest",
            SortOrder::Duration => "Fastest",
            SortOrder::Quality => "Best",
            SortOrder::Date => "Earliest",
        }
    }
}

/// Ceiling on stopovers per direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Stops {
    #[default]
    Any,
    Direct,
    UpToOne,
    UpToTwo,
}

impl Stops {
    /// Empty means "no limit"
    pub fn param(&self) -> &'static str {
        match self {
            Stops::Any => "",
            Stops::Direct => "0",
            Stops::UpToOne => "1",
            Stops::UpToTwo => "2",
        }
    }
}

impl Choice for Stops {
    const ALL: &'static [Self] = &[Stops::Any, Stops::Direct, Stops::UpToOne, Stops::UpToTwo];

    fn label(&self) -> &'static str {
        match self {
            Stops::Any => "Any number of stops",
            Stops::Direct => "Direct only",
            Stops::UpToOne => "Up to 1 stop",
            Stops::UpToTwo => "Up to 2 stops",
        }
    }
}

/// Departure time-of-day window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DepartTime {
    #[default]
    Any,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DepartTime {
    /// `(dtime_from, dtime_to)`, both empty for no restriction
    pub fn window(&self) -> (&'static str, &'static str) {
        match self {
            DepartTime::Any => ("", ""),
            DepartTime::Morning => ("06:00", "12:00"),
            DepartTime::Afternoon => ("12:00", "18:00"),
            DepartTime::Evening => ("18:00", "23:59"),
            DepartTime::Night => ("00:00", "06:00"),
        }
    }
}

impl Choice for DepartTime {
    const ALL: &'static [Self] = &[
        DepartTime::Any,
        DepartTime::Morning,
        DepartTime::Afternoon,
        DepartTime::Evening,
        DepartTime::Night,
    ];

    fn label(&self) -> &'static str {
        match self {
            DepartTime::Any => "Any time",
            DepartTime::Morning => "Morning (06-12)",
            DepartTime::Afternoon => "Afternoon (12-18)",
            DepartTime::Evening => "Evening (18-24)",
            DepartTime::Night => "Night (00-06)",
        }
    }
}

/// Whether self-transfer (virtually interlined) itineraries are wanted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Connections {
    #[default]
    Any,
    SelfTransfer,
    Protected,
}

impl Connections {
    /// Value of `enable_vi`; empty leaves the provider default
    pub fn param(&self) -> &'static str {
        match self {
            Connections::Any => "",
            Connections::SelfTransfer => "true",
            Connections::Protected => "false",
        }
    }
}

impl Choice for Connections {
    const ALL: &'static [Self] = &[
        Connections::Any,
        Connections::SelfTransfer,
        Connections::Protected,
    ];

    fn label(&self) -> &'static str {
        match self {
            Connections::Any => "Any connections",
            Connections::SelfTransfer => "Allow self-transfer",
            Connections::Protected => "Protected only",
        }
    }
}

/// How a field is edited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; only digits for numeric fields
    Text { numeric: bool },
    /// Left/right step through options
    Select,
}

/// Every control of the form, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    From,
    To,
    FlightType,
    Departure,
    Return,
    Adults,
    Children,
    Infants,
    Cabin,
    CabinBags,
    CheckedBags,
    Currency,
    Budget,
    Limit,
    Sort,
    Stops,
    Duration,
    Layover,
    DepartTime,
    Connections,
}

impl FormField {
    pub const ALL: &'static [FormField] = &[
        FormField::From,
        FormField::To,
        FormField::FlightType,
        FormField::Departure,
        FormField::Return,
        FormField::Adults,
        FormField::Children,
        FormField::Infants,
        FormField::Cabin,
        FormField::CabinBags,
        FormField::CheckedBags,
        FormField::Currency,
        FormField::Budget,
        FormField::Limit,
        FormField::Sort,
        FormField::Stops,
        FormField::Duration,
        FormField::Layover,
        FormField::DepartTime,
        FormField::Connections,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::From => "From",
            FormField::To => "To",
            FormField::FlightType => "Trip",
            FormField::Departure => "Depart",
            FormField::Return => "Return",
            FormField::Adults => "Adults",
            FormField::Children => "Children",
            FormField::Infants => "Infants",
            FormField::Cabin => "Class",
            FormField::CabinBags => "Cabin bags",
            FormField::CheckedBags => "Checked bags",
            FormField::Currency => "Currency",
            FormField::Budget => "Budget",
            FormField::Limit => "Results",
            FormField::Sort => "Sort",
            FormField::Stops => "Stops",
            FormField::Duration => "Max hours",
            FormField::Layover => "Layover ≤ h",
            FormField::DepartTime => "Departs",
            FormField::Connections => "Connections",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::From | FormField::To => FieldKind::Text { numeric: false },
            FormField::Budget | FormField::Limit | FormField::Duration | FormField::Layover => {
                FieldKind::Text { numeric: true }
            }
            _ => FieldKind::Select,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), FieldKind::Text { .. })
    }
}

/// Passenger counts offered by the steppers
pub const MAX_PASSENGERS: u32 = 9;

/// Current value of every control on the search form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchForm {
    pub from: String,
    pub to: String,
    pub flight_type: FlightType,
    pub departure: DatePicker,
    pub return_dates: DatePicker,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub cabin: Cabin,
    pub cabin_bags: u32,
    pub checked_bags: u32,
    pub currency: String,
    /// Currencies the selector offers
    pub currencies: Vec<String>,
    pub budget: String,
    pub limit: String,
    pub sort: SortOrder,
    pub stops: Stops,
    pub max_duration: String,
    pub layover: String,
    pub depart_time: DepartTime,
    pub connections: Connections,
}

impl SearchForm {
    pub fn new(today: NaiveDate, currency: String, currencies: Vec<String>) -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            flight_type: FlightType::default(),
            departure: DatePicker::new(PickerKind::Departure, today),
            return_dates: DatePicker::new(PickerKind::Return, today),
            adults: 1,
            children: 0,
            infants: 0,
            cabin: Cabin::default(),
            cabin_bags: 0,
            checked_bags: 0,
            currency,
            currencies,
            budget: String::new(),
            limit: String::new(),
            sort: SortOrder::default(),
            stops: Stops::default(),
            max_duration: String::new(),
            layover: String::new(),
            depart_time: DepartTime::default(),
            connections: Connections::default(),
        }
    }

    /// Fields currently shown; the return picker is hidden for one-way trips
    pub fn visible_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .iter()
            .copied()
            .filter(|field| *field != FormField::Return || self.flight_type == FlightType::Return)
            .collect()
    }

    pub fn bag_limits(&self) -> BagLimits {
        BagLimits::for_passengers(self.adults, self.children)
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::From => Some(&mut self.from),
            FormField::To => Some(&mut self.to),
            FormField::Budget => Some(&mut self.budget),
            FormField::Limit => Some(&mut self.limit),
            FormField::Duration => Some(&mut self.max_duration),
            FormField::Layover => Some(&mut self.layover),
            _ => None,
        }
    }

    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::From => Some(&self.from),
            FormField::To => Some(&self.to),
            FormField::Budget => Some(&self.budget),
            FormField::Limit => Some(&self.limit),
            FormField::Duration => Some(&self.max_duration),
            FormField::Layover => Some(&self.layover),
            _ => None,
        }
    }

    /// Type a character into a text field. Returns whether anything changed.
    pub fn input(&mut self, field: FormField, c: char) -> bool {
        let FieldKind::Text { numeric } = field.kind() else {
            return false;
        };
        if c.is_control() || (numeric && !c.is_ascii_digit()) {
            return false;
        }
        match self.text_mut(field) {
            Some(text) => {
                text.push(c);
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self, field: FormField) -> bool {
        self.text_mut(field)
            .map(|text| text.pop().is_some())
            .unwrap_or(false)
    }

    /// Step a select control. Returns whether anything changed.
    pub fn cycle(&mut self, field: FormField, step: i8, today: NaiveDate) -> bool {
        let before = self.clone();
        match field {
            FormField::FlightType => self.flight_type = self.flight_type.cycle(step),
            FormField::Departure => self.departure.cycle(step, today),
            FormField::Return => self.return_dates.cycle(step, today),
            FormField::Adults => {
                self.adults = step_count(self.adults, step, 1, MAX_PASSENGERS);
                self.sync_bag_options();
            }
            FormField::Children => {
                self.children = step_count(self.children, step, 0, MAX_PASSENGERS);
                self.sync_bag_options();
            }
            FormField::Infants => {
                self.infants = step_count(self.infants, step, 0, MAX_PASSENGERS);
            }
            FormField::Cabin => self.cabin = self.cabin.cycle(step),
            FormField::CabinBags => {
                let max = self.bag_limits().max_cabin;
                self.cabin_bags = step_count(self.cabin_bags, step, 0, max);
            }
            FormField::CheckedBags => {
                let max = self.bag_limits().max_checked;
                self.checked_bags = step_count(self.checked_bags, step, 0, max);
            }
            FormField::Currency => self.cycle_currency(step),
            FormField::Sort => self.sort = self.sort.cycle(step),
            FormField::Stops => self.stops = self.stops.cycle(step),
            FormField::DepartTime => self.depart_time = self.depart_time.cycle(step),
            FormField::Connections => self.connections = self.connections.cycle(step),
            FormField::From
            | FormField::To
            | FormField::Budget
            | FormField::Limit
            | FormField::Duration
            | FormField::Layover => {}
        }
        *self != before
    }

    /// Regenerate the bag selectors after a passenger count changed
    pub fn sync_bag_options(&mut self) {
        let limits = self.bag_limits();
        self.cabin_bags = baggage::clamp_selection(self.cabin_bags, limits.max_cabin);
        self.checked_bags = baggage::clamp_selection(self.checked_bags, limits.max_checked);
    }

    /// Switch currency; any budget typed in the old currency is cleared
    pub fn set_currency(&mut self, currency: &str) {
        if self.currency != currency {
            self.currency = currency.to_string();
            self.budget.clear();
        }
    }

    fn cycle_currency(&mut self, step: i8) {
        if self.currencies.is_empty() {
            return;
        }
        let len = self.currencies.len() as i64;
        let index = self
            .currencies
            .iter()
            .position(|c| *c == self.currency)
            .map(|i| i as i64)
            .unwrap_or(-1);
        let next = (index + i64::from(step)).rem_euclid(len) as usize;
        let currency = self.currencies[next].clone();
        self.set_currency(&currency);
    }
}

fn step_count(value: u32, step: i8, min: u32, max: u32) -> u32 {
    let next = i64::from(value) + i64::from(step);
    next.clamp(i64::from(min), i64::from(max.max(min))) as u32
}
