//! The fetch state machine behind the repository list.
//!
//! `RepoFetchController` owns one [`FetchState`] and publishes a fresh
//! snapshot through a watch channel after every transition. Consumers read
//! snapshots and call the three operations; nothing else crosses the seam.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::fetch::{RepositoryPage, RepositorySource};
use crate::models::Repository;
use crate::pagination::PageLinks;

/// Repositories requested per API call.
pub const PER_PAGE: u32 = 10;

/// Snapshot of everything a consumer needs to render the repository list.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState {
    /// True only while the very first page of a search is in flight.
    pub is_loading: bool,
    /// True only while a pagination fetch is in flight.
    pub is_loading_next_page: bool,
    /// Accumulated results in API response order, duplicates and all.
    /// Append-only within one search; replaced wholesale by a new search.
    pub repositories: Vec<Repository>,
    /// User-facing message for the last failure; cleared by any success.
    pub error: Option<String>,
    /// Subject of the current/last search. `None` until the first search.
    pub username: Option<String>,
    pub current_page: u32,
    /// From the `last` link when the server sent one, else the fetched page.
    pub total_pages: u32,
    pub has_next_page: bool,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            is_loading: false,
            is_loading_next_page: false,
            repositories: Vec::new(),
            error: None,
            username: None,
            current_page: 1,
            total_pages: 1,
            has_next_page: false,
        }
    }
}

impl FetchState {
    pub fn has_repositories(&self) -> bool {
        !self.repositories.is_empty()
    }

    /// Whether any fetch is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_loading_next_page
    }

    /// "Page 2 of 5" style summary.
    pub fn page_info(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// Drives repository fetches and owns the state consumers observe.
///
/// The operations return immediately; the network round trip runs on a
/// spawned Tokio task that publishes a new snapshot when it resolves. A task
/// that resolves after its search was superseded, or after the controller
/// was dropped, publishes nothing. Must be used from within a Tokio runtime.
pub struct RepoFetchController {
    source: Arc<dyn RepositorySource>,
    state: Arc<watch::Sender<FetchState>>,
    generation: Arc<AtomicU64>,
}

impl RepoFetchController {
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            source,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Current snapshot.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Start a fresh search for `username`'s repositories.
    ///
    /// The state resets immediately - previous results disappear before the
    /// network resolves - and any fetch still in flight is superseded.
    pub fn search(&self, username: &str) {
        info!(username, "searching repositories");

        // The generation bump and the reset happen under the sender's lock
        // so an in-flight pagination claim cannot interleave between them.
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState {
                is_loading: true,
                ..FetchState::default()
            };
        });

        self.spawn_fetch(username.to_string(), 1, true, generation);
    }

    /// Fetch the page after the current one, if the server advertised one.
    ///
    /// A no-op while a pagination fetch is already running, when there is no
    /// next page, or before any search has run.
    pub fn load_next_page(&self) {
        let mut target = None;
        self.state.send_if_modified(|state| {
            if state.is_loading_next_page || !state.has_next_page {
                return false;
            }
            let Some(username) = state.username.clone() else {
                return false;
            };

            state.is_loading_next_page = true;
            target = Some((
                username,
                state.current_page + 1,
                self.generation.load(Ordering::SeqCst),
            ));
            true
        });

        let Some((username, page, generation)) = target else {
            return;
        };

        info!(username, page, "loading next page");
        self.spawn_fetch(username, page, false, generation);
    }

    /// Re-run whichever request failed last: the initial search while nothing
    /// is loaded yet, pagination otherwise. No-op before the first search.
    pub fn retry_last_request(&self) {
        let current = self.state();
        let Some(username) = current.username else {
            return;
        };

        if current.repositories.is_empty() {
            self.search(&username);
        } else {
            self.load_next_page();
        }
    }

    fn spawn_fetch(&self, username: String, page: u32, is_new_search: bool, generation: u64) {
        let source = Arc::clone(&self.source);
        let state = Arc::downgrade(&self.state);
        let current_generation = Arc::clone(&self.generation);

        tokio::spawn(async move {
            let result = source.user_repositories(&username, page, PER_PAGE).await;

            // The controller may be gone by the time the response lands.
            let Some(state) = state.upgrade() else {
                return;
            };

            state.send_if_modified(|state| {
                // A newer search owns the state now; this response is stale.
                if current_generation.load(Ordering::SeqCst) != generation {
                    info!(username, page, "discarding superseded response");
                    return false;
                }

                match result {
                    Ok(fetched) => apply_page(state, fetched, username, page, is_new_search),
                    Err(err) => {
                        warn!(page, error = %err, "repository fetch failed");
                        apply_failure(state, err.to_string(), username, is_new_search);
                    }
                }
                true
            });
        });
    }
}

/// Merge a successful page into the state.
fn apply_page(
    state: &mut FetchState,
    fetched: RepositoryPage,
    username: String,
    page: u32,
    is_new_search: bool,
) {
    let links = PageLinks::parse(fetched.link_header.as_deref());

    if is_new_search {
        state.repositories = fetched.repositories;
    } else {
        state.repositories.extend(fetched.repositories);
    }

    state.is_loading = false;
    state.is_loading_next_page = false;
    state.error = None;
    state.username = Some(username);
    state.current_page = page;
    state.has_next_page = links.has_next();
    state.total_pages = links.total_pages(page);
}

/// Record a failed fetch. A pagination failure keeps the already-loaded
/// repositories and the username they belong to.
fn apply_failure(state: &mut FetchState, message: String, username: String, is_new_search: bool) {
    state.is_loading = false;
    state.is_loading_next_page = false;
    state.error = Some(message);
    if is_new_search {
        state.username = Some(username);
    }
}
