//! Date ranges, quick-range presets and the date/time formats used across the UI

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Inclusive range of travel dates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `Nov 3 - Dec 2, 2026`
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %-d"),
            self.end.format("%b %-d, %Y")
        )
    }
}

/// A named quick-range offered by a date picker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub range: DateRange,
}

/// Which of the two pickers a range belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PickerKind {
    Departure,
    Return,
}

impl PickerKind {
    pub fn default_range(self, today: NaiveDate) -> DateRange {
        match self {
            PickerKind::Departure => DateRange::new(today, today + Duration::days(29)),
            PickerKind::Return => {
                DateRange::new(today + Duration::days(30), today + Duration::days(59))
            }
        }
    }

    pub fn presets(self, today: NaiveDate) -> Vec<Preset> {
        match self {
            PickerKind::Departure => departure_presets(today),
            PickerKind::Return => return_presets(today),
        }
    }
}

/// A date picker control: the current range plus the preset it came from, if any
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatePicker {
    pub kind: PickerKind,
    pub range: DateRange,
    pub preset: Option<usize>,
}

impl DatePicker {
    pub fn new(kind: PickerKind, today: NaiveDate) -> Self {
        Self {
            kind,
            range: kind.default_range(today),
            preset: None,
        }
    }

    /// Step through the quick-ranges. Stepping past either end returns to the
    /// initial range.
    pub fn cycle(&mut self, step: i8, today: NaiveDate) {
        let presets = self.kind.presets(today);
        if presets.is_empty() {
            return;
        }
        let len = presets.len() as i64;
        // Position -1 is the initial (non-preset) range.
        let current = self.preset.map(|p| p as i64).unwrap_or(-1);
        let mut next = current + i64::from(step);
        if next < -1 {
            next = len - 1;
        } else if next >= len {
            next = -1;
        }
        if next < 0 {
            self.preset = None;
            self.range = self.kind.default_range(today);
        } else {
            let index = next as usize;
            self.preset = Some(index);
            self.range = presets[index].range;
        }
    }

    pub fn preset_label(&self, today: NaiveDate) -> Option<&'static str> {
        let index = self.preset?;
        self.kind.presets(today).get(index).map(|preset| preset.label)
    }
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

fn month_span(today: NaiveDate, months_ahead: u32) -> DateRange {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let start = first_of_month
        .checked_add_months(Months::new(months_ahead))
        .unwrap_or(first_of_month);
    let end = start
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(start);
    DateRange::new(start, end)
}

pub fn departure_presets(today: NaiveDate) -> Vec<Preset> {
    let week = week_start(today);
    let ahead = |days: i64| DateRange::new(today, today + Duration::days(days));
    vec![
        Preset {
            label: "This Weekend",
            range: DateRange::new(week + Duration::days(6), week + Duration::days(7)),
        },
        Preset {
            label: "Next 7 Days",
            range: ahead(6),
        },
        Preset {
            label: "Next 30 Days",
            range: ahead(29),
        },
        Preset {
            label: "Next 60 Days",
            range: ahead(59),
        },
        Preset {
            label: "Next 90 Days",
            range: ahead(89),
        },
        Preset {
            label: "Next 180 Days",
            range: ahead(179),
        },
    ]
}

pub fn return_presets(today: NaiveDate) -> Vec<Preset> {
    let next_week = week_start(today) + Duration::days(7);
    vec![
        Preset {
            label: "Next Week",
            range: DateRange::new(next_week, next_week + Duration::days(6)),
        },
        Preset {
            label: "Next Weekend",
            range: DateRange::new(next_week + Duration::days(6), next_week + Duration::days(7)),
        },
        Preset {
            label: "Next Month",
            range: month_span(today, 1),
        },
        Preset {
            label: "After 2 Months",
            range: month_span(today, 2),
        },
        Preset {
            label: "After 3 Months",
            range: month_span(today, 3),
        },
        Preset {
            label: "After 6 Months",
            range: month_span(today, 6),
        },
    ]
}

/// Date format expected by the search API (`DD/MM/YYYY`)
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `Wed May 1st 2024`
pub fn format_long_date(at: NaiveDateTime) -> String {
    let day = at.day();
    format!(
        "{} {}{} {}",
        at.format("%a %b"),
        day,
        ordinal_suffix(day),
        at.year()
    )
}

/// `6:05am`
pub fn format_time(at: NaiveDateTime) -> String {
    at.format("%-I:%M%P").to_string()
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
