//! Render snapshot tests using RenderHarness
//!
//! FRAMEWORK PATTERN: RenderHarness
//! - Create harness with terminal dimensions
//! - Render component to test buffer
//! - Convert to string for snapshot testing

use chrono::{NaiveDate, TimeZone, Utc};
use flightlist::{
    airline_filter::AirlineDictionary,
    compare::Disabled,
    components::{
        AirlineFilterOverlay, AirlineFilterOverlayProps, AppLayout, Component, ResultsList,
        ResultsListProps, app_view, render_collapsed, render_status_bar,
    },
    currency::CurrencySymbols,
    results::{NO_FLIGHTS_MESSAGE, SearchResults, render_results},
    state::{AppState, Flight, Focus, RouteLeg, SearchResponse, Viewport},
};
use tui_dispatch::{DataResource, testing::*};

fn leg(airline: &str, hour: u32, minutes: i64) -> RouteLeg {
    let departure = NaiveDate::from_ymd_opt(2026, 12, 4)
        .unwrap()
        .and_hms_opt(hour, 15, 0)
        .unwrap();
    let arrival = departure + chrono::Duration::minutes(minutes);
    RouteLeg {
        airline: airline.into(),
        flight_no: "77".into(),
        fly_from: "LGW".into(),
        fly_to: "FCO".into(),
        city_from: "London".into(),
        city_to: "Rome".into(),
        local_departure: departure,
        utc_departure: Utc.from_utc_datetime(&departure),
        local_arrival: arrival,
        utc_arrival: Utc.from_utc_datetime(&arrival),
        is_return: false,
    }
}

fn loaded_results() -> SearchResults {
    let response = SearchResponse {
        currency: "GBP".into(),
        flights: vec![
            Flight {
                price: 45.99,
                booking_token: "a".into(),
                deep_link: "https://book.example/a".into(),
                route: vec![leg("U2", 6, 155)],
            },
            Flight {
                price: 120.0,
                booking_token: "b".into(),
                deep_link: "https://book.example/b".into(),
                route: vec![leg("BA", 9, 160)],
            },
        ],
    };
    let symbols = CurrencySymbols::from_offered(&["GBP".to_string()]);
    render_results(response, &symbols, &Disabled)
}

fn loaded_state() -> AppState {
    let results = loaded_results();
    let mut state = AppState::default();
    state.filter.rebuild(&results.dictionary);
    state.results = DataResource::Loaded(results);
    state.focus = Focus::Results;
    state
}

fn render_list(state: &AppState, width: u16, height: u16) -> String {
    let mut render = RenderHarness::new(width, height);
    let mut component = ResultsList;
    render.render_to_string_plain(|frame| {
        let props = ResultsListProps {
            state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_loading_state() {
    let state = AppState {
        results: DataResource::Loading,
        tick_count: 3,
        ..Default::default()
    };

    let output = render_list(&state, 80, 20);
    assert!(
        output.contains("Searching flights..."),
        "Should show the spinner line:\n{}",
        output
    );
}

#[test]
fn test_render_initial_state() {
    let output = render_list(&AppState::default(), 80, 20);

    // Banner is FIGlet art; the hint below it is plain text
    assert!(output.contains("to search"), "Should show search prompt");
}

#[test]
fn test_render_loaded_list() {
    let output = render_list(&loaded_state(), 140, 20);

    assert!(output.contains("£45.99"));
    assert!(output.contains("£120"));
    assert!(output.contains("6:15am - 8:50am"));
    assert!(output.contains("2h 35m"));
    assert!(output.contains("2 of 2 · All airlines"));
    // No comparison link with the disabled provider
    assert!(!output.contains("Compare:"));
}

#[test]
fn test_render_no_flights() {
    let state = AppState {
        results: DataResource::Loaded(SearchResults::default()),
        ..Default::default()
    };

    let output = render_list(&state, 80, 20);
    assert!(output.contains(NO_FLIGHTS_MESSAGE));
}

#[test]
fn test_render_status_bar_hints_follow_focus() {
    let mut render = RenderHarness::new(100, 1);

    let state = AppState::default();
    let output = render.render_to_string_plain(|frame| {
        render_status_bar(frame, frame.area(), &state);
    });
    assert!(output.contains("search"), "Should show search hint");
    assert!(output.contains("results"), "Should show focus hint");

    let state = loaded_state();
    let output = render.render_to_string_plain(|frame| {
        render_status_bar(frame, frame.area(), &state);
    });
    assert!(output.contains("airlines"), "Should show filter hint");
    assert!(output.contains("quit"), "Should show quit hint");
}

#[test]
fn test_render_narrow_layout_collapses_form() {
    let mut render = RenderHarness::new(60, 24);
    let mut state = loaded_state();
    state.form.from = "LON".into();
    state.form.to = "ROM".into();
    state.viewport = Viewport {
        width: 60,
        height: 24,
    };

    let output = render.render_to_string_plain(|frame| {
        let layout = AppLayout::new(frame.area(), &state);
        assert!(layout.form_collapsed(&state));
        render_collapsed(frame, layout.form, "Search", app_view::form_summary(&state));
        render_collapsed(
            frame,
            layout.results,
            "Flights",
            app_view::results_summary(&state),
        );
    });

    assert!(output.contains("LON → ROM"));
    assert!(output.contains("2 flights from £45.99"));
}

#[test]
fn test_render_filter_overlay() {
    let mut render = RenderHarness::new(80, 20);
    let mut overlay = AirlineFilterOverlay::new();
    let mut state = loaded_state();
    state
        .filter
        .rebuild(&AirlineDictionary::from_codes(["BA", "U2"]));
    state.filter_open = true;

    let output = render.render_to_string_plain(|frame| {
        overlay.set_open(true);
        let props = AirlineFilterOverlayProps {
            filter: &state.filter,
            cursor: 0,
            is_focused: true,
        };
        overlay.render(frame, frame.area(), props);
    });

    assert!(output.contains("[x] British Airways (BA)"));
    assert!(output.contains("[x] easyJet (U2)"));
    assert!(output.contains("All airlines"));
}
