use async_trait::async_trait;
use shared::{domain::Official, error::DirectoryError, protocol::PageLink};

pub mod config;
pub mod controller;
pub mod dedupe;
pub mod options;
pub mod pagination;
pub mod request;
pub mod transport;

pub use controller::{
    events::{DirectoryEvent, ViewModel},
    state::{DirectoryState, FetchTicket, PageError},
    DirectoryController, PendingFetch, PendingOptions, Startup,
};
pub use request::DirectoryRequest;
pub use transport::HttpDirectorySource;

/// One decoded directory page, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPayload {
    pub officials: Vec<Official>,
    pub links: Vec<PageLink>,
}

/// Read-only access to the remote directory.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch_officials(
        &self,
        request: &DirectoryRequest,
    ) -> Result<DirectoryPayload, DirectoryError>;
    async fn fetch_party_codes(&self) -> Result<Vec<String>, DirectoryError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
