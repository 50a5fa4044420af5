//! Effects - side effects declared by the reducer

use crate::criteria::SearchCriteria;
use crate::html::GeneratedPage;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone)]
pub enum Effect {
    /// Run search `id`; responses for older ids are dropped
    SearchFlights { id: u64, criteria: SearchCriteria },
    /// Fetch and decode logos for these airline codes
    LoadLogos { codes: Vec<String> },
    /// Tell the page generator about a fresh render
    NotifyPage { page: GeneratedPage },
}
