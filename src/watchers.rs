//! Read-through views of the list store that follow its change broadcasts.
//!
//! A watcher subscribes before its first read, so no mutation can slip
//! between the snapshot and the subscription. Dropping a watcher drops its
//! subscription.
//!
//! These are for in-process front ends that embed the crate as a library and
//! render the lists live. The HTTP layer reads [`ListStore`] directly.

use std::sync::Arc;

use crate::{
    domain::models::ListEvent,
    storage::{ListStore, Subscription},
};

pub struct ListWatcher {
    store: Arc<ListStore>,
    event: ListEvent,
    subscription: Subscription,
    current: Vec<i64>,
}

impl ListWatcher {
    /// Follows the watch-later ids, in insertion order.
    pub async fn bookmarks(store: Arc<ListStore>) -> Self {
        Self::mount(store, ListEvent::BookmarksChanged).await
    }

    /// Follows the recently-viewed ids, most recent first.
    pub async fn viewed(store: Arc<ListStore>) -> Self {
        Self::mount(store, ListEvent::ViewedChanged).await
    }

    async fn mount(store: Arc<ListStore>, event: ListEvent) -> Self {
        let subscription = store.subscribe();
        let current = read(&store, event).await;
        Self {
            store,
            event,
            subscription,
            current,
        }
    }

    pub fn current(&self) -> &[i64] {
        &self.current
    }

    /// Wait for the next change to this list and return the fresh value.
    /// `None` once the store has gone away.
    pub async fn changed(&mut self) -> Option<&[i64]> {
        if !self.subscription.wait_for(self.event).await {
            return None;
        }
        self.current = read(&self.store, self.event).await;
        Some(&self.current)
    }
}

async fn read(store: &ListStore, event: ListEvent) -> Vec<i64> {
    match event {
        ListEvent::BookmarksChanged => store.bookmark_ids().await,
        ListEvent::ViewedChanged => store.viewed_ids().await,
    }
}

/// Watch-later membership of a single movie.
pub struct BookmarkWatcher {
    movie_id: i64,
    ids: ListWatcher,
    bookmarked: bool,
}

impl BookmarkWatcher {
    pub async fn new(store: Arc<ListStore>, movie_id: i64) -> Self {
        let ids = ListWatcher::bookmarks(store).await;
        let bookmarked = ids.current().contains(&movie_id);
        Self {
            movie_id,
            ids,
            bookmarked,
        }
    }

    pub fn movie_id(&self) -> i64 {
        self.movie_id
    }

    pub fn is_bookmarked(&self) -> bool {
        self.bookmarked
    }

    pub fn bookmark_ids(&self) -> &[i64] {
        self.ids.current()
    }

    /// Flip membership. The flag is taken from the store's answer; the id
    /// list catches up on the next [`changed`](Self::changed).
    pub async fn toggle(&mut self) -> bool {
        self.bookmarked = self.ids.store.toggle_bookmark(self.movie_id).await;
        self.bookmarked
    }

    pub async fn changed(&mut self) -> Option<bool> {
        let ids = self.ids.changed().await?;
        self.bookmarked = ids.contains(&self.movie_id);
        Some(self.bookmarked)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> Arc<ListStore> {
        Arc::new(ListStore::new(Arc::new(MemoryStorage::new())))
    }

    #[tokio::test]
    async fn first_read_reflects_existing_state() {
        let store = store();
        store.add_bookmark(1).await;
        store.record_viewed(7).await;

        let bookmarks = ListWatcher::bookmarks(store.clone()).await;
        let viewed = ListWatcher::viewed(store.clone()).await;
        assert_eq!(bookmarks.current(), &[1]);
        assert_eq!(viewed.current(), &[7]);
    }

    #[tokio::test]
    async fn watcher_follows_only_its_own_list() {
        let store = store();
        let mut viewed = ListWatcher::viewed(store.clone()).await;

        store.add_bookmark(3).await;
        store.record_viewed(4).await;

        let ids = tokio::time::timeout(Duration::from_secs(1), viewed.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids, &[4]);
    }

    #[tokio::test]
    async fn bookmark_watcher_toggle_updates_flag_immediately() {
        let store = store();
        let mut watcher = BookmarkWatcher::new(store.clone(), 42).await;
        assert!(!watcher.is_bookmarked());

        assert!(watcher.toggle().await);
        assert!(watcher.is_bookmarked());
        assert!(store.is_bookmarked(42).await);

        assert!(!watcher.toggle().await);
        assert!(!watcher.is_bookmarked());
    }

    #[tokio::test]
    async fn bookmark_watcher_sees_changes_made_elsewhere() {
        let store = store();
        let mut watcher = BookmarkWatcher::new(store.clone(), 5).await;

        store.add_bookmark(5).await;
        assert_eq!(watcher.changed().await, Some(true));
        assert_eq!(watcher.bookmark_ids(), &[5]);

        store.remove_bookmark(5).await;
        assert_eq!(watcher.changed().await, Some(false));
    }

    #[tokio::test]
    async fn dropping_watchers_unregisters_listeners() {
        let store = store();
        let a = ListWatcher::bookmarks(store.clone()).await;
        let b = BookmarkWatcher::new(store.clone(), 1).await;
        assert_eq!(store.subscriber_count(), 2);
        drop(a);
        drop(b);
        assert_eq!(store.subscriber_count(), 0);
    }
}
