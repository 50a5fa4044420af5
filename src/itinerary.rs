//! Derived views of a flight: directions, durations, stops, layovers and stays

use chrono::{DateTime, Utc};

use crate::state::{Flight, RouteLeg};

/// The legs of a flight split by direction, in route order
#[derive(Debug)]
pub struct Itinerary<'a> {
    pub outbound: Vec<&'a RouteLeg>,
    pub inbound: Vec<&'a RouteLeg>,
}

impl<'a> Itinerary<'a> {
    pub fn of(flight: &'a Flight) -> Self {
        let (inbound, outbound) = flight.route.iter().partition(|leg| leg.is_return);
        Self { outbound, inbound }
    }

    pub fn is_round_trip(&self) -> bool {
        !self.inbound.is_empty()
    }
}

/// What sits between two consecutive legs, or a leg itself
#[derive(Clone, Debug, PartialEq)]
pub enum Segment<'a> {
    Leg(&'a RouteLeg),
    /// Connection within one direction
    Layover { city: &'a str, minutes: i64 },
    /// Time at the destination before the first inbound leg
    Stay { city: &'a str, nights: i64 },
}

/// `"{h}h {m}m"`, hours floored
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_minutes()
}

/// Flight time of a single leg, in minutes
pub fn leg_minutes(leg: &RouteLeg) -> i64 {
    minutes_between(leg.utc_departure, leg.utc_arrival)
}

/// First departure to last arrival of a direction, in minutes
pub fn total_minutes(legs: &[&RouteLeg]) -> i64 {
    match (legs.first(), legs.last()) {
        (Some(first), Some(last)) => minutes_between(first.utc_departure, last.utc_arrival),
        _ => 0,
    }
}

pub fn total_duration(legs: &[&RouteLeg]) -> String {
    format_duration(total_minutes(legs))
}

pub fn leg_duration(leg: &RouteLeg) -> String {
    format_duration(leg_minutes(leg))
}

pub fn stops_text(legs: usize) -> String {
    match legs.saturating_sub(1) {
        0 => "Direct".to_string(),
        1 => "1 Stop".to_string(),
        stops => format!("{stops} Stops"),
    }
}

pub fn nights_label(nights: i64) -> String {
    if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{nights} nights")
    }
}

/// Accommodation search in the stay city
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StayLink {
    pub provider: &'static str,
    pub url: String,
}

pub fn accommodation_links(city: &str) -> [StayLink; 2] {
    let city = urlencoding::encode(city);
    [
        StayLink {
            provider: "Kayak",
            url: format!("https://www.kayak.com/hotels-dateless/{city}"),
        },
        StayLink {
            provider: "Booking",
            url: format!("https://www.booking.com/searchresults.html?ss={city}"),
        },
    ]
}

/// Index of the last outbound leg, i.e. the first position where the next
/// leg is a return leg. Only the first such boundary counts.
pub fn stay_boundary(route: &[RouteLeg]) -> Option<usize> {
    route.windows(2).position(|pair| pair[1].is_return)
}

/// Legs interleaved with the layovers and the single stay between them
pub fn segments(route: &[RouteLeg]) -> Vec<Segment<'_>> {
    let boundary = stay_boundary(route);
    let mut segments = Vec::with_capacity(route.len() * 2);
    for (index, leg) in route.iter().enumerate() {
        segments.push(Segment::Leg(leg));
        let Some(next) = route.get(index + 1) else {
            continue;
        };
        if Some(index) == boundary {
            segments.push(Segment::Stay {
                city: &leg.city_to,
                nights: (next.utc_departure - leg.utc_arrival).num_days(),
            });
        } else {
            segments.push(Segment::Layover {
                city: &leg.city_to,
                minutes: minutes_between(leg.utc_arrival, next.utc_departure),
            });
        }
    }
    segments
}

/// Two decimals, except whole-looking prices (cents ≤ 9) drop them
pub fn format_price(price: f64) -> String {
    let fixed = format!("{price:.2}");
    match fixed.split_once('.') {
        Some((whole, cents)) if cents.parse::<u32>().unwrap_or(0) <= 9 => whole.to_string(),
        _ => fixed,
    }
}

/// Stable identifier for an entry's detail panel
pub fn collapse_id(booking_token: &str) -> String {
    let token: String = booking_token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("flight-{token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(day: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn leg(
        city_to: &str,
        dep: chrono::NaiveDateTime,
        arr: chrono::NaiveDateTime,
        is_return: bool,
    ) -> RouteLeg {
        RouteLeg {
            airline: "FR".into(),
            flight_no: "1".into(),
            fly_from: "AAA".into(),
            fly_to: "BBB".into(),
            city_from: "Origin".into(),
            city_to: city_to.into(),
            local_departure: dep,
            utc_departure: Utc.from_utc_datetime(&dep),
            local_arrival: arr,
            utc_arrival: Utc.from_utc_datetime(&arr),
            is_return,
        }
    }

    fn round_trip() -> Vec<RouteLeg> {
        vec![
            leg("Dublin", at(1, 6, 5), at(1, 7, 30), false),
            leg("Boston", at(1, 9, 0), at(1, 16, 45), false),
            leg("Dublin", at(8, 18, 0), at(9, 1, 10), true),
            leg("London", at(9, 3, 0), at(9, 4, 20), true),
        ]
    }

    #[test]
    fn test_stops_text() {
        assert_eq!(stops_text(1), "Direct");
        assert_eq!(stops_text(2), "1 Stop");
        assert_eq!(stops_text(4), "3 Stops");
    }

    #[test]
    fn test_durations() {
        let route = round_trip();
        let flight = Flight {
            price: 100.0,
            booking_token: "tok".into(),
            deep_link: String::new(),
            route,
        };
        let itinerary = Itinerary::of(&flight);
        assert_eq!(itinerary.outbound.len(), 2);
        assert!(itinerary.is_round_trip());
        assert_eq!(total_duration(&itinerary.outbound), "10h 40m");
        assert_eq!(leg_duration(itinerary.outbound[0]), "1h 25m");
        assert_eq!(total_duration(&[]), "0h 0m");
    }

    #[test]
    fn test_stay_detected_once_between_directions() {
        let route = round_trip();
        assert_eq!(stay_boundary(&route), Some(1));

        let segments = segments(&route);
        let stays: Vec<_> = segments
            .iter()
            .filter(|s| matches!(s, Segment::Stay { .. }))
            .collect();
        assert_eq!(stays.len(), 1);
        assert_eq!(
            segments[3],
            Segment::Stay {
                city: "Boston",
                nights: 7
            }
        );
        assert_eq!(
            segments[1],
            Segment::Layover {
                city: "Dublin",
                minutes: 90
            }
        );
        assert_eq!(
            segments[5],
            Segment::Layover {
                city: "Dublin",
                minutes: 110
            }
        );
    }

    #[test]
    fn test_one_way_has_no_stay() {
        let route = vec![
            leg("Dublin", at(1, 6, 5), at(1, 7, 30), false),
            leg("Boston", at(1, 9, 0), at(1, 16, 45), false),
        ];
        assert_eq!(stay_boundary(&route), None);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(123.05), "123");
        assert_eq!(format_price(123.0), "123");
        assert_eq!(format_price(123.5), "123.50");
        assert_eq!(format_price(99.99), "99.99");
    }

    #[test]
    fn test_accommodation_links_encode_city() {
        let [kayak, booking] = accommodation_links("New York");
        assert_eq!(kayak.provider, "Kayak");
        assert_eq!(kayak.url, "https://www.kayak.com/hotels-dateless/New%20York");
        assert_eq!(
            booking.url,
            "https://www.booking.com/searchresults.html?ss=New%20York"
        );
    }

    #[test]
    fn test_collapse_id_and_nights() {
        assert_eq!(collapse_id("ab+c/d=_-9"), "flight-abcd_-9");
        assert_eq!(nights_label(1), "1 night");
        assert_eq!(nights_label(0), "0 nights");
    }
}
