//! The watch-later and recently-viewed lists.
//!
//! [`ListStore`] is the only writer of both lists. Every successful mutation
//! persists the full list and then broadcasts a [`ListEvent`], so a listener
//! that reads after receiving the event sees the new value. Storage failures
//! and malformed data never reach the caller: reads come back empty and writes
//! become no-ops without a broadcast.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{
    Mutex, broadcast,
    broadcast::error::{RecvError, TryRecvError},
};

use super::KeyValueStorage;
use crate::domain::models::{BookmarkEntry, ListEvent, ViewedEntry};

pub const WATCH_LATER_KEY: &str = "movie_watch_later";
pub const RECENTLY_VIEWED_KEY: &str = "movie_recently_viewed";
pub const MAX_RECENTLY_VIEWED: usize = 50;

const EVENT_CAPACITY: usize = 64;

pub struct ListStore {
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<ListEvent>,
    // serializes read-modify-write within this process
    write_lock: Mutex<()>,
}

impl ListStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// Register a listener. Dropping the returned subscription unregisters it.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.events.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// `None` when storage could not be read. Malformed data counts as an
    /// empty list so the next write replaces it.
    async fn load_entries<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        match self.storage.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    tracing::warn!(error = %e, key, "ignoring malformed list data");
                    Some(vec![])
                }
            },
            Ok(None) => Some(vec![]),
            Err(e) => {
                tracing::warn!(error = %format!("{:?}", e), key, "failed to read list");
                None
            }
        }
    }

    async fn read_entries<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_entries(key).await.unwrap_or_default()
    }

    /// Returns whether the list was persisted.
    async fn write_entries<T: Serialize>(&self, key: &str, entries: &[T]) -> bool {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, key, "failed to encode list");
                return false;
            }
        };
        match self.storage.set(key, &raw).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %format!("{:?}", e), key, "failed to write list");
                false
            }
        }
    }

    fn broadcast(&self, event: ListEvent) {
        // Err only means nobody is listening
        let _ = self.events.send(event);
    }

    // ===== watch later =====

    pub async fn bookmark_ids(&self) -> Vec<i64> {
        self.read_entries::<BookmarkEntry>(WATCH_LATER_KEY)
            .await
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    pub async fn is_bookmarked(&self, movie_id: i64) -> bool {
        self.bookmark_ids().await.contains(&movie_id)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn add_bookmark(&self, movie_id: i64) {
        let _guard = self.write_lock.lock().await;
        if let Some(entries) = self.load_entries(WATCH_LATER_KEY).await {
            self.insert_bookmark(entries, movie_id).await;
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn remove_bookmark(&self, movie_id: i64) {
        let _guard = self.write_lock.lock().await;
        if let Some(entries) = self.load_entries(WATCH_LATER_KEY).await {
            self.delete_bookmark(entries, movie_id).await;
        }
    }

    /// Returns whether the movie is bookmarked afterwards; `false` if the list
    /// could not be read.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn toggle_bookmark(&self, movie_id: i64) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(entries) = self.load_entries::<BookmarkEntry>(WATCH_LATER_KEY).await else {
            return false;
        };
        if entries.iter().any(|e| e.id == movie_id) {
            self.delete_bookmark(entries, movie_id).await;
            false
        } else {
            self.insert_bookmark(entries, movie_id).await;
            true
        }
    }

    async fn insert_bookmark(&self, mut entries: Vec<BookmarkEntry>, movie_id: i64) {
        if entries.iter().any(|e| e.id == movie_id) {
            return;
        }
        entries.push(BookmarkEntry {
            id: movie_id,
            added_at: now_millis(),
        });
        if self.write_entries(WATCH_LATER_KEY, &entries).await {
            self.broadcast(ListEvent::BookmarksChanged);
        }
    }

    async fn delete_bookmark(&self, mut entries: Vec<BookmarkEntry>, movie_id: i64) {
        entries.retain(|e| e.id != movie_id);
        if self.write_entries(WATCH_LATER_KEY, &entries).await {
            self.broadcast(ListEvent::BookmarksChanged);
        }
    }

    // ===== recently viewed =====

    /// Most recent first.
    pub async fn viewed_ids(&self) -> Vec<i64> {
        let mut entries = self.read_entries::<ViewedEntry>(RECENTLY_VIEWED_KEY).await;
        // stable: entries viewed in the same millisecond keep stored order
        entries.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        entries.into_iter().map(|e| e.id).collect()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn record_viewed(&self, movie_id: i64) {
        let _guard = self.write_lock.lock().await;
        let Some(mut entries) = self
            .load_entries::<ViewedEntry>(RECENTLY_VIEWED_KEY)
            .await
        else {
            return;
        };
        entries.retain(|e| e.id != movie_id);
        entries.insert(
            0,
            ViewedEntry {
                id: movie_id,
                viewed_at: now_millis(),
            },
        );
        entries.truncate(MAX_RECENTLY_VIEWED);
        if self.write_entries(RECENTLY_VIEWED_KEY, &entries).await {
            self.broadcast(ListEvent::ViewedChanged);
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn clear_viewed(&self) {
        let _guard = self.write_lock.lock().await;
        match self.storage.remove(RECENTLY_VIEWED_KEY).await {
            Ok(()) => self.broadcast(ListEvent::ViewedChanged),
            Err(e) => {
                tracing::warn!(error = %format!("{:?}", e), "failed to clear recently viewed")
            }
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A registered listener on a [`ListStore`].
pub struct Subscription {
    receiver: broadcast::Receiver<ListEvent>,
}

impl Subscription {
    /// Wait for the next `wanted` event. Returns `false` once the store is gone.
    ///
    /// If the listener fell behind and events were dropped, this returns
    /// `true` as well; the caller re-reads either way.
    pub async fn wait_for(&mut self, wanted: ListEvent) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event == wanted => return true,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "list listener lagged");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }

    /// Next already-delivered event, if any.
    pub fn try_next(&mut self) -> Option<ListEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
