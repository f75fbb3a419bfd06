//! Controller layer: view events, reducer-like state transitions, and fetch
//! orchestration.

pub mod events;
pub mod state;

use std::sync::Arc;

use shared::domain::{CommittedQuery, FilterCriteria, FilterField, FilterOptions};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{options::load_party_codes, DirectorySource};
use events::{DirectoryEvent, ViewModel};
use state::{Applied, DirectoryState, FetchTicket, PageError};

const EVENT_CAPACITY: usize = 256;

/// A spawned directory fetch.
pub struct PendingFetch {
    generation: u64,
    task: JoinHandle<()>,
}

impl PendingFetch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits until the fetch has been applied or discarded.
    pub async fn settled(self) {
        if let Err(err) = self.task.await {
            warn!(generation = self.generation, "directory: fetch task ended abnormally: {err}");
        }
    }
}

/// The spawned party list load.
pub struct PendingOptions {
    task: JoinHandle<()>,
}

impl PendingOptions {
    pub async fn settled(self) {
        if let Err(err) = self.task.await {
            warn!("options: load task ended abnormally: {err}");
        }
    }
}

pub struct Startup {
    pub directory: PendingFetch,
    pub options: PendingOptions,
}

pub struct DirectoryController {
    source: Arc<dyn DirectorySource>,
    state: Mutex<DirectoryState>,
    events: broadcast::Sender<DirectoryEvent>,
}

impl DirectoryController {
    pub fn new(source: Arc<dyn DirectorySource>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            source,
            state: Mutex::new(DirectoryState::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    /// Publishes the region codes, starts the party list load and fetches the
    /// first unfiltered page. The two requests do not wait on each other.
    pub async fn start(self: &Arc<Self>) -> Startup {
        let options = self.options().await;
        let _ = self.events.send(DirectoryEvent::OptionsUpdated(options));
        let options = self.load_options();
        let directory = self.refresh().await;
        Startup { directory, options }
    }

    pub fn load_options(self: &Arc<Self>) -> PendingOptions {
        let controller = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = load_party_codes(controller.source.as_ref()).await;
            let options = {
                let mut state = controller.state.lock().await;
                if !state.set_party_codes(outcome) {
                    return;
                }
                state.options().clone()
            };
            let _ = controller
                .events
                .send(DirectoryEvent::OptionsUpdated(options));
        });
        PendingOptions { task }
    }

    /// Refetches the committed query as it stands.
    pub async fn refresh(self: &Arc<Self>) -> PendingFetch {
        let ticket = self.state.lock().await.begin_fetch();
        self.dispatch(ticket).await
    }

    pub async fn set_field(&self, field: FilterField, value: impl Into<String>) {
        self.state.lock().await.set_field(field, value);
    }

    pub async fn commit(self: &Arc<Self>) -> PendingFetch {
        let ticket = self.state.lock().await.commit();
        info!(
            generation = ticket.generation,
            unconstrained = ticket.query.criteria.is_unconstrained(),
            "directory: filters committed"
        );
        self.dispatch(ticket).await
    }

    /// `Ok(None)` when `page` is already the committed page.
    pub async fn go_to_page(
        self: &Arc<Self>,
        page: u32,
    ) -> Result<Option<PendingFetch>, PageError> {
        let ticket = self.state.lock().await.go_to_page(page)?;
        match ticket {
            Some(ticket) => Ok(Some(self.dispatch(ticket).await)),
            None => Ok(None),
        }
    }

    pub async fn view(&self) -> ViewModel {
        self.state.lock().await.view()
    }

    pub async fn options(&self) -> FilterOptions {
        self.state.lock().await.options().clone()
    }

    pub async fn draft(&self) -> FilterCriteria {
        self.state.lock().await.draft().clone()
    }

    pub async fn committed(&self) -> CommittedQuery {
        self.state.lock().await.committed().clone()
    }

    /// Announces the loading state, then runs the fetch in its own task.
    async fn dispatch(self: &Arc<Self>, ticket: FetchTicket) -> PendingFetch {
        let view = self.state.lock().await.view();
        let _ = self.events.send(DirectoryEvent::ViewUpdated(view));

        let generation = ticket.generation;
        let controller = Arc::clone(self);
        let task = tokio::spawn(async move {
            controller.run_fetch(ticket).await;
        });
        PendingFetch { generation, task }
    }

    async fn run_fetch(&self, ticket: FetchTicket) {
        let request = ticket.request();
        info!(
            generation = ticket.generation,
            page = request.page,
            "directory: fetching page"
        );

        let outcome = self.source.fetch_officials(&request).await;
        if let Err(err) = &outcome {
            warn!(
                generation = ticket.generation,
                code = err.code().as_str(),
                "directory: fetch failed: {err}"
            );
        }

        let (applied, view) = {
            let mut state = self.state.lock().await;
            let applied = state.apply_result(&ticket, outcome);
            (applied, state.view())
        };

        match applied {
            Applied::Current => {
                info!(
                    generation = ticket.generation,
                    entities = view.entities.len(),
                    total_pages = view.total_pages,
                    "directory: page applied"
                );
                let _ = self.events.send(DirectoryEvent::ViewUpdated(view));
            }
            Applied::Stale => {
                debug!(generation = ticket.generation, "directory: discarding stale result");
            }
        }
    }
}
