pub mod airline_filter_overlay;
pub mod app_view;
pub mod results_list;
pub mod search_form;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use airline_filter_overlay::{AirlineFilterOverlay, AirlineFilterOverlayProps};
pub use app_view::{AppLayout, render_collapsed, render_status_bar};
pub use results_list::{ResultsList, ResultsListProps};
pub use search_form::{SearchFormPanel, SearchFormPanelProps};
