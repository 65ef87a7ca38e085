//! Debounced free-text search.
//!
//! Rapid query changes collapse into one outbound search for the last value
//! once input has been quiet for the debounce window.
//!
//! Meant for interactive library consumers that feed keystrokes in. The HTTP
//! `/v1/search` endpoint is request/response and calls the gateway directly.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

use crate::tmdb_client::{Movie, MovieGateway};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs at most one pending task; scheduling a new one cancels the old.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Cancel anything pending and run `task` right away.
    pub fn run_now<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(task));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Ready {
        query: String,
        movies: Vec<Movie>,
    },
    Failed {
        query: String,
        message: String,
    },
}

/// Search-as-you-type state for one consumer.
pub struct SearchSession {
    gateway: Arc<MovieGateway>,
    debouncer: Debouncer,
    state: Arc<watch::Sender<SearchState>>,
    last_query: Option<String>,
}

impl SearchSession {
    pub fn new(gateway: Arc<MovieGateway>) -> Self {
        Self::with_delay(gateway, SEARCH_DEBOUNCE)
    }

    pub fn with_delay(gateway: Arc<MovieGateway>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            gateway,
            debouncer: Debouncer::new(delay),
            state: Arc::new(state),
            last_query: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_query(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.debouncer.cancel();
            self.last_query = None;
            self.state.send_replace(SearchState::Idle);
            return;
        }

        let query = query.to_string();
        self.last_query = Some(query.clone());
        self.state.send_replace(SearchState::Loading {
            query: query.clone(),
        });
        self.debouncer.schedule(run_search(
            self.gateway.clone(),
            self.state.clone(),
            query,
        ));
    }

    /// Re-issue the last query without waiting for the debounce window.
    pub fn retry(&mut self) {
        let Some(query) = self.last_query.clone() else {
            return;
        };
        self.state.send_replace(SearchState::Loading {
            query: query.clone(),
        });
        self.debouncer
            .run_now(run_search(self.gateway.clone(), self.state.clone(), query));
    }
}

async fn run_search(
    gateway: Arc<MovieGateway>,
    state: Arc<watch::Sender<SearchState>>,
    query: String,
) {
    tracing::debug!(%query, "running search");
    let next = match gateway.search(&query, 1).await {
        Ok(page) => SearchState::Ready {
            query,
            movies: page.results,
        },
        Err(e) => SearchState::Failed {
            query,
            message: e.to_string(),
        },
    };
    state.send_replace(next);
}
