//! HTML rendition of the results, posted to the page generator

use std::fmt::Write;

use serde::Serialize;

use crate::dates::{format_long_date, format_time};
use crate::itinerary::{self, Itinerary, Segment};
use crate::results::{ResultEntry, SearchResults};
use crate::state::RouteLeg;

/// Form body of a generated-page notification
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedPage {
    pub from_code: String,
    pub to_code: String,
    pub flights: String,
    pub currency: String,
    /// Formatted price of the first flight, empty without flights
    pub price: String,
    pub flight_type: String,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn direction_row(out: &mut String, legs: &[&RouteLeg]) {
    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        return;
    };
    let _ = write!(
        out,
        "<div class=\"direction\"><span class=\"times\">{} - {}</span> \
         <small>{}</small> <span class=\"duration\">{}</span> \
         <small>{} ({}) &rarr; {} ({})</small> <span class=\"stops\">{}</span></div>",
        format_time(first.local_departure),
        format_time(last.local_arrival),
        escape(&format_long_date(first.local_departure)),
        itinerary::total_duration(legs),
        escape(&first.city_from),
        escape(&first.fly_from),
        escape(&last.city_to),
        escape(&last.fly_to),
        itinerary::stops_text(legs.len()),
    );
}

fn entry_item(out: &mut String, entry: &ResultEntry, symbol: &str) {
    let flight = &entry.flight;
    let itinerary = Itinerary::of(flight);
    let _ = write!(
        out,
        "<li class=\"flight\" id=\"{}\"><small>{}</small><span class=\"price\">{}</span>",
        escape(&entry.collapse_id),
        escape(symbol),
        itinerary::format_price(flight.price)
    );
    direction_row(out, &itinerary.outbound);
    direction_row(out, &itinerary.inbound);

    out.push_str("<div class=\"details\">");
    for segment in itinerary::segments(&flight.route) {
        match segment {
            Segment::Leg(leg) => {
                let _ = write!(
                    out,
                    "<p class=\"route\">{} {} {}: {} {} ({}) &rarr; {} {} ({})</p>",
                    escape(&format_long_date(leg.local_departure)),
                    escape(&leg.airline),
                    escape(&leg.flight_no),
                    format_time(leg.local_departure),
                    escape(&leg.city_from),
                    escape(&leg.fly_from),
                    format_time(leg.local_arrival),
                    escape(&leg.city_to),
                    escape(&leg.fly_to),
                );
            }
            Segment::Layover { city, minutes } => {
                let _ = write!(
                    out,
                    "<p class=\"layover\">Layover in {} for {}</p>",
                    escape(city),
                    itinerary::format_duration(minutes)
                );
            }
            Segment::Stay { city, nights } => {
                let [kayak, booking] = itinerary::accommodation_links(city);
                let _ = write!(
                    out,
                    "<p class=\"stay\">Stay in {} for {}, find accommodations with \
                     <a href=\"{}\" rel=\"nofollow\">{}</a> and \
                     <a href=\"{}\" rel=\"nofollow\">{}</a></p>",
                    escape(city),
                    itinerary::nights_label(nights),
                    escape(&kayak.url),
                    kayak.provider,
                    escape(&booking.url),
                    booking.provider,
                );
            }
        }
    }
    let _ = write!(
        out,
        "<a href=\"{}\" rel=\"nofollow\">Book Flight</a></div></li>",
        escape(&flight.deep_link)
    );
}

/// `<ul class="flights-list">` with one `<li class="flight">` per entry
pub fn flights_fragment(results: &SearchResults) -> String {
    let mut out = String::from("<ul class=\"flights-list\">");
    for entry in &results.entries {
        entry_item(&mut out, entry, &results.currency_symbol);
    }
    out.push_str("</ul>");
    out
}
