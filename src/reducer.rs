//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::{debug, error, info, warn};
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::criteria::SearchCriteria;
use crate::currency::CurrencySymbols;
use crate::effect::Effect;
use crate::html::{self, GeneratedPage};
use crate::logos::{self, LogoState};
use crate::results::{self, SEARCH_ERROR_MESSAGE};
use crate::state::{AppState, Focus, Viewport};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Form actions =====
        Action::FormFieldNext => move_form_cursor(state, 1),

        Action::FormFieldPrev => move_form_cursor(state, -1),

        Action::FormInput(c) => match state.current_field() {
            Some(field) if state.form.input(field, c) => DispatchResult::changed(),
            _ => DispatchResult::unchanged(),
        },

        Action::FormBackspace => match state.current_field() {
            Some(field) if state.form.backspace(field) => DispatchResult::changed(),
            _ => DispatchResult::unchanged(),
        },

        Action::FormCycle(step) => {
            let Some(field) = state.current_field() else {
                return DispatchResult::unchanged();
            };
            if !state.form.cycle(field, step, state.today) {
                return DispatchResult::unchanged();
            }
            // The trip type decides whether the return picker is shown
            let visible = state.form.visible_fields().len();
            state.form_cursor = state.form_cursor.min(visible.saturating_sub(1));
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchSubmit => {
            let criteria = SearchCriteria::collect(&state.form, state.country.as_deref());
            state.search_seq += 1;
            state.results = DataResource::Loading;
            // Filter options survive until the next render rebuilds them
            state.filter_open = false;
            state.filter_cursor = 0;
            state.selected = 0;
            state.scroll_offset = 0;
            state.tick_count = 0;
            info!(
                id = state.search_seq,
                "searching {} -> {}", criteria.fly_from, criteria.fly_to
            );
            DispatchResult::changed_with(Effect::SearchFlights {
                id: state.search_seq,
                criteria,
            })
        }

        Action::SearchDidLoad { id, response } => {
            if id != state.search_seq {
                debug!(id, latest = state.search_seq, "dropping stale search response");
                return DispatchResult::unchanged();
            }

            let symbols = CurrencySymbols::from_offered(&state.form.currencies);
            let rendered = results::render_results(response, &symbols, state.comparison.builder());
            info!(id, flights = rendered.entries.len(), "search loaded");

            state.filter.rebuild(&rendered.dictionary);
            state.selected = 0;
            state.scroll_offset = 0;
            let has_entries = !rendered.is_empty();
            let page =
                (state.notify_pages && has_entries).then(|| generated_page(state, &rendered));
            state.results = DataResource::Loaded(rendered);
            if has_entries {
                state.focus = Focus::Results;
            }

            let mut effects = Vec::new();
            effects.extend(request_visible_logos(state));
            effects.extend(page.map(|page| Effect::NotifyPage { page }));
            DispatchResult::changed_with_many(effects)
        }

        Action::SearchDidError { id, error } => {
            if id != state.search_seq {
                debug!(id, latest = state.search_seq, "dropping stale search error");
                return DispatchResult::unchanged();
            }
            error!(id, "Error fetching flights: {}", error);
            state.results = DataResource::Failed(SEARCH_ERROR_MESSAGE.to_string());
            DispatchResult::changed()
        }

        // ===== Results actions =====
        Action::ResultsMove(delta) => {
            let count = state.visible_entries().len();
            if count == 0 {
                return DispatchResult::unchanged();
            }
            let next = (state.selected as i64 + i64::from(delta)).clamp(0, count as i64 - 1);
            let next = next as usize;
            if next == state.selected {
                return DispatchResult::unchanged();
            }
            state.selected = next;
            keep_selection_visible(state);
            changed_with_logos(state)
        }

        Action::ResultsToggle => {
            let Some(index) = state.selected_entry() else {
                return DispatchResult::unchanged();
            };
            let DataResource::Loaded(results) = &mut state.results else {
                return DispatchResult::unchanged();
            };
            match results.entries.get_mut(index) {
                Some(entry) => {
                    entry.expanded = !entry.expanded;
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }

        // ===== Filter actions =====
        Action::FilterOpen => {
            if !state.results.is_loaded() || state.filter.options.is_empty() || state.filter_open
            {
                return DispatchResult::unchanged();
            }
            state.filter_open = true;
            state.filter_cursor = 0;
            DispatchResult::changed()
        }

        Action::FilterClose => {
            if !state.filter_open {
                return DispatchResult::unchanged();
            }
            state.filter_open = false;
            DispatchResult::changed()
        }

        Action::FilterCursor(index) => {
            if index < state.filter.options.len() && index != state.filter_cursor {
                state.filter_cursor = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::FilterToggle => {
            if !state.filter.toggle(state.filter_cursor) {
                return DispatchResult::unchanged();
            }
            after_filter_change(state)
        }

        Action::FilterSelectAll => {
            state.filter.select_all();
            after_filter_change(state)
        }

        Action::FilterDeselectAll => {
            state.filter.deselect_all();
            after_filter_change(state)
        }

        // ===== Logo actions =====
        Action::LogoDidLoad { code, tile } => {
            state.logos.insert(code, LogoState::Ready(tile));
            DispatchResult::changed()
        }

        Action::LogoDidError { code, error } => {
            debug!("logo {} unavailable: {}", code, error);
            state.logos.insert(code, LogoState::Failed);
            DispatchResult::changed()
        }

        // ===== Page actions =====
        Action::PageNotifyDidComplete(filename) => {
            info!("page generated: {}", filename.as_deref().unwrap_or("-"));
            state.last_notify = Some(match filename {
                Some(name) => format!("generated {name}"),
                None => "accepted".to_string(),
            });
            DispatchResult::changed()
        }

        Action::PageNotifyDidError(error) => {
            warn!("page notification failed: {}", error);
            state.last_notify = Some(format!("failed: {error}"));
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiFocusNext => {
            state.focus = state.focus.toggle();
            state.filter_open = false;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            let viewport = Viewport { width, height };
            if viewport == state.viewport {
                return DispatchResult::unchanged();
            }
            state.viewport = viewport;
            keep_selection_visible(state);
            changed_with_logos(state)
        }

        // ===== Global actions =====
        Action::Tick => {
            if state.is_searching() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn move_form_cursor(state: &mut AppState, step: i64) -> DispatchResult<Effect> {
    let count = state.form.visible_fields().len() as i64;
    if count == 0 {
        return DispatchResult::unchanged();
    }
    state.form_cursor = (state.form_cursor as i64 + step).rem_euclid(count) as usize;
    DispatchResult::changed()
}

/// Scroll so the selected entry falls inside the current page
fn keep_selection_visible(state: &mut AppState) {
    let page = state.results_page();
    if state.selected < state.scroll_offset {
        state.scroll_offset = state.selected;
    } else if state.selected >= state.scroll_offset + page {
        state.scroll_offset = state.selected + 1 - page;
    }
}

/// Ask for the logos of entries on the current page that were never requested
fn request_visible_logos(state: &mut AppState) -> Option<Effect> {
    let codes = {
        let results = state.results.data()?;
        let visible = state.visible_entries();
        let page = visible
            .iter()
            .skip(state.scroll_offset)
            .take(state.results_page())
            .filter_map(|&index| results.entries.get(index));
        logos::pending_codes(page, &state.logos)
    };
    if codes.is_empty() {
        return None;
    }
    for code in &codes {
        state.logos.insert(code.clone(), LogoState::Loading);
    }
    Some(Effect::LoadLogos { codes })
}

fn changed_with_logos(state: &mut AppState) -> DispatchResult<Effect> {
    match request_visible_logos(state) {
        Some(effect) => DispatchResult::changed_with(effect),
        None => DispatchResult::changed(),
    }
}

fn after_filter_change(state: &mut AppState) -> DispatchResult<Effect> {
    let count = state.visible_entries().len();
    state.selected = state.selected.min(count.saturating_sub(1));
    state.scroll_offset = state.scroll_offset.min(state.selected);
    keep_selection_visible(state);
    changed_with_logos(state)
}

fn generated_page(state: &AppState, rendered: &results::SearchResults) -> GeneratedPage {
    GeneratedPage {
        from_code: state.form.from.trim().to_string(),
        to_code: state.form.to.trim().to_string(),
        flights: html::flights_fragment(rendered),
        currency: state.form.currency.clone(),
        price: rendered.lead_price().unwrap_or_default(),
        flight_type: state.form.flight_type.param().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use crate::logos::{LogoTile, Rgb};
    use crate::results::SearchResults;
    use crate::state::{Flight, RouteLeg, SearchResponse};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn leg(airline: &str, is_return: bool) -> RouteLeg {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(6, 5, 0)
            .unwrap();
        RouteLeg {
            airline: airline.into(),
            flight_no: "1".into(),
            fly_from: "STN".into(),
            fly_to: "BCN".into(),
            city_from: "London".into(),
            city_to: "Barcelona".into(),
            local_departure: at,
            utc_departure: Utc.from_utc_datetime(&at),
            local_arrival: at,
            utc_arrival: Utc.from_utc_datetime(&at),
            is_return,
        }
    }

    fn response(airlines: &[&[&str]]) -> SearchResponse {
        SearchResponse {
            currency: "EUR".into(),
            flights: airlines
                .iter()
                .enumerate()
                .map(|(i, codes)| Flight {
                    price: 50.0 + i as f64,
                    booking_token: format!("token-{i}"),
                    deep_link: "https://example.com".into(),
                    route: codes.iter().map(|c| leg(c, false)).collect(),
                })
                .collect(),
        }
    }

    fn loaded_state(airlines: &[&[&str]]) -> AppState {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit);
        let id = state.search_seq;
        reducer(
            &mut state,
            Action::SearchDidLoad {
                id,
                response: response(airlines),
            },
        );
        state
    }

    #[test]
    fn test_submit_sets_loading_and_emits_search() {
        let mut state = AppState::default();
        state.filter.rebuild(&crate::airline_filter::AirlineDictionary::from_codes(["FR"]));

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(result.changed);
        assert!(state.is_searching());
        assert_eq!(state.search_seq, 1);
        assert_eq!(state.filter.options.len(), 1);
        assert!(!reducer(&mut state, Action::FilterOpen).changed);
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(
            result.effects[0],
            Effect::SearchFlights { id: 1, .. }
        ));
    }

    #[test]
    fn test_failed_search_shows_message_and_hides_loading() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit);

        let result = reducer(
            &mut state,
            Action::SearchDidError {
                id: 1,
                error: "search returned HTTP 500: boom".into(),
            },
        );

        assert!(result.changed);
        assert!(!state.is_searching());
        assert_eq!(state.results.error(), Some(SEARCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit);
        reducer(&mut state, Action::SearchSubmit);
        let before = state.clone();

        let result = reducer(
            &mut state,
            Action::SearchDidLoad {
                id: 1,
                response: response(&[&["FR"]]),
            },
        );
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert!(state.is_searching());
        assert_eq!(state.search_seq, before.search_seq);

        let result = reducer(
            &mut state,
            Action::SearchDidError {
                id: 1,
                error: "late".into(),
            },
        );
        assert!(!result.changed);
        assert!(state.is_searching());
    }

    #[test]
    fn test_load_rebuilds_filter_and_requests_logos() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit);

        let result = reducer(
            &mut state,
            Action::SearchDidLoad {
                id: 1,
                response: response(&[&["FR"], &["W6", "FR"]]),
            },
        );

        assert!(result.changed);
        assert_eq!(state.filter.options.len(), 2);
        assert!(state.filter.all_selected());
        assert_eq!(state.focus, Focus::Results);
        assert_eq!(state.logos.get("FR"), Some(&LogoState::Loading));
        assert!(matches!(
            &result.effects[0],
            Effect::LoadLogos { codes } if codes == &vec!["FR".to_string(), "W6".to_string()]
        ));
        // No page generator configured
        assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn test_notify_page_after_render() {
        let mut state = AppState {
            notify_pages: true,
            ..Default::default()
        };
        state.form.from = "STN".into();
        reducer(&mut state, Action::SearchSubmit);

        let result = reducer(
            &mut state,
            Action::SearchDidLoad {
                id: 1,
                response: response(&[&["FR"]]),
            },
        );
        let page = result.effects.iter().find_map(|e| match e {
            Effect::NotifyPage { page } => Some(page),
            _ => None,
        });
        let page = page.unwrap();
        assert_eq!(page.from_code, "STN");
        assert_eq!(page.price, "50");
        assert_eq!(page.flight_type, "round");
        assert!(page.flights.contains("flights-list"));
    }

    #[test]
    fn test_empty_response_is_not_an_error() {
        let mut state = loaded_state(&[]);
        assert!(state.results.is_loaded());
        assert!(state.results.data().is_some_and(SearchResults::is_empty));
        assert_eq!(state.focus, Focus::Form);
        assert!(!reducer(&mut state, Action::FilterOpen).changed);
    }

    #[test]
    fn test_filter_hides_entries_and_clamps_selection() {
        let mut state = loaded_state(&[&["FR"], &["W6"], &["W6", "FR"]]);
        reducer(&mut state, Action::ResultsMove(5));
        assert_eq!(state.selected, 2);

        reducer(&mut state, Action::FilterOpen);
        assert!(state.filter_open);
        let w6 = state
            .filter
            .options
            .iter()
            .position(|o| o.code == "W6")
            .unwrap();
        reducer(&mut state, Action::FilterCursor(w6));
        reducer(&mut state, Action::FilterToggle);

        assert_eq!(state.visible_entries(), vec![0]);
        assert_eq!(state.selected, 0);

        reducer(&mut state, Action::FilterDeselectAll);
        assert!(state.visible_entries().is_empty());

        reducer(&mut state, Action::FilterSelectAll);
        assert_eq!(state.visible_entries().len(), 3);
    }

    #[test]
    fn test_deselected_airline_survives_next_search() {
        let mut state = loaded_state(&[&["FR"], &["W6"]]);
        let w6 = state
            .filter
            .options
            .iter()
            .position(|o| o.code == "W6")
            .unwrap();
        reducer(&mut state, Action::FilterCursor(w6));
        reducer(&mut state, Action::FilterToggle);

        reducer(&mut state, Action::SearchSubmit);
        let id = state.search_seq;
        reducer(
            &mut state,
            Action::SearchDidLoad {
                id,
                response: response(&[&["FR"], &["W6"], &["U2"]]),
            },
        );

        assert_eq!(state.filter.options.len(), 3);
        assert!(!state.filter.is_selected("W6"));
        assert!(state.filter.is_selected("FR"));
        assert!(state.filter.is_selected("U2"));
        assert_eq!(state.visible_entries().len(), 2);
    }

    #[test]
    fn test_toggle_expands_selected_entry() {
        let mut state = loaded_state(&[&["FR"], &["W6"]]);
        reducer(&mut state, Action::ResultsMove(1));
        reducer(&mut state, Action::ResultsToggle);

        let entries = &state.results.data().unwrap().entries;
        assert!(!entries[0].expanded);
        assert!(entries[1].expanded);
    }

    #[test]
    fn test_logo_results_are_cached() {
        let mut state = AppState::default();
        let tile = LogoTile {
            width: 1,
            height: 1,
            pixels: vec![Rgb(1, 2, 3)],
        };
        reducer(
            &mut state,
            Action::LogoDidLoad {
                code: "FR".into(),
                tile: tile.clone(),
            },
        );
        reducer(
            &mut state,
            Action::LogoDidError {
                code: "ZZ".into(),
                error: "404".into(),
            },
        );
        assert_eq!(state.logos.get("FR"), Some(&LogoState::Ready(tile)));
        assert_eq!(state.logos.get("ZZ"), Some(&LogoState::Failed));
    }

    #[test]
    fn test_form_cursor_wraps_and_tracks_trip_type() {
        let mut state = AppState::default();
        reducer(&mut state, Action::FormFieldPrev);
        assert_eq!(state.current_field(), Some(FormField::Connections));

        state.form_cursor = 2;
        assert_eq!(state.current_field(), Some(FormField::FlightType));
        reducer(&mut state, Action::FormCycle(1));
        reducer(&mut state, Action::FormFieldNext);
        reducer(&mut state, Action::FormFieldNext);
        assert_eq!(state.current_field(), Some(FormField::Adults));
    }

    #[test]
    fn test_typing_goes_to_text_fields_only() {
        let mut state = AppState::default();
        assert!(reducer(&mut state, Action::FormInput('L')).changed);
        assert_eq!(state.form.from, "L");
        assert!(reducer(&mut state, Action::FormBackspace).changed);

        state.form_cursor = 2;
        assert!(!reducer(&mut state, Action::FormInput('x')).changed);
    }

    #[test]
    fn test_tick_only_while_searching() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        reducer(&mut state, Action::SearchSubmit);
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick_count, 1);
    }
}
