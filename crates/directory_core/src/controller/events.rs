//! What the presentation layer observes.

use serde::Serialize;
use shared::{
    domain::{FilterOptions, Official},
    error::DirectoryError,
};

/// Read-only snapshot of the directory for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub entities: Vec<Official>,
    pub loading: bool,
    pub total_pages: u32,
    pub current_page: u32,
    pub error: Option<DirectoryError>,
    /// False until the first successful fetch lands.
    pub has_result: bool,
}

impl ViewModel {
    /// Nothing to list once loading is over.
    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.entities.is_empty()
    }

    pub fn shows_pagination(&self) -> bool {
        !self.entities.is_empty() && self.total_pages > 1
    }
}

#[derive(Debug, Clone)]
pub enum DirectoryEvent {
    ViewUpdated(ViewModel),
    OptionsUpdated(FilterOptions),
}
