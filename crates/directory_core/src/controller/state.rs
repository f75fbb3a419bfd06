//! Reducer-style state transitions for the directory. Everything here is
//! synchronous; network work happens in the controller around it.

use shared::{
    domain::{
        CommittedQuery, FilterCriteria, FilterField, FilterOptions, OptionsStatus, PageResult,
    },
    error::DirectoryError,
};
use thiserror::Error;

use super::events::ViewModel;
use crate::{
    dedupe::dedupe_by_id, pagination::resolve_total_pages, request::DirectoryRequest,
    DirectoryPayload,
};

/// Tags one fetch with the query it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: CommittedQuery,
}

impl FetchTicket {
    pub fn request(&self) -> DirectoryRequest {
        DirectoryRequest::from_query(&self.query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page {requested} is outside 1..={total_pages}")]
    OutOfRange { requested: u32, total_pages: u32 },
    #[error("page {requested} unavailable until the new filters load")]
    FiltersPending { requested: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

#[derive(Debug)]
pub struct DirectoryState {
    draft: FilterCriteria,
    committed: CommittedQuery,
    result: Option<PageResult>,
    /// Filters the applied result was fetched with.
    result_criteria: Option<FilterCriteria>,
    loading: bool,
    error: Option<DirectoryError>,
    generation: u64,
    options: FilterOptions,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryState {
    pub fn new() -> Self {
        Self {
            draft: FilterCriteria::default(),
            committed: CommittedQuery::default(),
            result: None,
            result_criteria: None,
            loading: false,
            error: None,
            generation: 0,
            options: FilterOptions::initial(),
        }
    }

    pub fn draft(&self) -> &FilterCriteria {
        &self.draft
    }

    pub fn committed(&self) -> &CommittedQuery {
        &self.committed
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn result(&self) -> Option<&PageResult> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Page count of the last applied result, 1 before any result.
    pub fn total_pages(&self) -> u32 {
        self.result.as_ref().map_or(1, |result| result.total_pages)
    }

    pub fn set_field(&mut self, field: FilterField, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    /// Confirms the draft. Always refetches, starting from page 1.
    pub fn commit(&mut self) -> FetchTicket {
        self.committed = CommittedQuery::with_criteria(self.draft.clone());
        self.begin_fetch()
    }

    /// Moves to `page` with unchanged filters. `Ok(None)` when already there.
    ///
    /// The range check uses the page count of the last applied result, so
    /// paging is refused while newly committed filters have not loaded.
    pub fn go_to_page(&mut self, page: u32) -> Result<Option<FetchTicket>, PageError> {
        if page != self.committed.page && self.awaiting_committed_filters() {
            return Err(PageError::FiltersPending { requested: page });
        }
        let total_pages = self.total_pages();
        if page < 1 || page > total_pages {
            return Err(PageError::OutOfRange {
                requested: page,
                total_pages,
            });
        }
        if page == self.committed.page {
            return Ok(None);
        }
        self.committed = self.committed.with_page(page);
        Ok(Some(self.begin_fetch()))
    }

    fn awaiting_committed_filters(&self) -> bool {
        self.result.is_some()
            && self.result_criteria.as_ref() != Some(&self.committed.criteria)
    }

    /// Starts a fetch for the current committed query.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.generation,
            query: self.committed.clone(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a fetch outcome unless a newer fetch has started since.
    /// Failures keep the previous result on screen.
    pub fn apply_result(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<DirectoryPayload, DirectoryError>,
    ) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(payload) => {
                let entities = dedupe_by_id(payload.officials);
                let total_pages =
                    resolve_total_pages(&payload.links, ticket.query.page, entities.len());
                self.result = Some(PageResult {
                    entities,
                    current_page: ticket.query.page,
                    total_pages,
                });
                self.result_criteria = Some(ticket.query.criteria.clone());
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err);
            }
        }
        Applied::Current
    }

    /// Publishes the party list. Only the first outcome counts.
    pub fn set_party_codes(&mut self, outcome: Result<Vec<String>, DirectoryError>) -> bool {
        if self.options.party_status != OptionsStatus::Pending {
            return false;
        }
        match outcome {
            Ok(codes) => {
                self.options.party_codes = codes;
                self.options.party_status = OptionsStatus::Ready;
            }
            Err(_) => {
                self.options.party_codes.clear();
                self.options.party_status = OptionsStatus::Unavailable;
            }
        }
        true
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            entities: self
                .result
                .as_ref()
                .map(|result| result.entities.clone())
                .unwrap_or_default(),
            loading: self.loading,
            total_pages: self.total_pages(),
            current_page: self.committed.page,
            error: self.error.clone(),
            has_result: self.result.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/state_tests.rs"]
mod tests;
