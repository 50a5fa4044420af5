//! Actions, grouped into categories by prefix

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::logos::LogoTile;
use crate::state::SearchResponse;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Form category =====
    /// Move the form cursor to the next visible field
    FormFieldNext,

    FormFieldPrev,

    /// Type into the focused text field
    FormInput(char),

    FormBackspace,

    /// Step the focused select control by -1/+1
    FormCycle(i8),

    // ===== Search category =====
    /// Intent: collect the form and start a search (triggers async task)
    SearchSubmit,

    /// Result: search `id` returned flights
    SearchDidLoad { id: u64, response: SearchResponse },

    /// Result: search `id` failed; the error is only logged
    SearchDidError { id: u64, error: String },

    // ===== Results category =====
    /// Move the selection by a number of entries
    ResultsMove(i16),

    /// Expand or collapse the selected entry
    ResultsToggle,

    // ===== Filter category =====
    FilterOpen,

    FilterClose,

    /// Highlight an airline in the overlay
    FilterCursor(usize),

    /// Toggle the airline under the cursor
    FilterToggle,

    FilterSelectAll,

    FilterDeselectAll,

    // ===== Logo category =====
    LogoDidLoad { code: String, tile: LogoTile },

    LogoDidError { code: String, error: String },

    // ===== Page category =====
    /// Result: generated page notification finished (filename if any)
    PageNotifyDidComplete(Option<String>),

    PageNotifyDidError(String),

    // ===== UI category =====
    /// Switch keyboard focus between the form and the results
    UiFocusNext,

    UiTerminalResize(u16, u16),

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading spinner
    Tick,

    /// Exit the application
    Quit,
}
