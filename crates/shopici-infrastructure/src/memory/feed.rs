//! Broadcast-backed local change feed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use shopici_core::error::Result;
use shopici_core::realtime::{ChangeFeed, ChannelFilter, FeedSubscription, InsertEvent};

struct Subscriber {
    id: u64,
    filter: ChannelFilter,
    sender: mpsc::UnboundedSender<InsertEvent>,
}

/// An in-process [`ChangeFeed`].
///
/// Publishers call [`publish`](Self::publish) with a table name and a row;
/// every live subscription whose filter matches receives the insert event.
/// Dropping a subscription removes it from the registry.
#[derive(Clone, Default)]
pub struct LocalChangeFeed {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_id: Arc<AtomicU64>,
}

impl LocalChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a row-insert event to matching subscribers.
    pub fn publish(&self, table: &str, row: serde_json::Value) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|sub| {
            if !sub.filter.matches(table, &row) {
                return true;
            }
            // A failed send means the receiver is gone; prune it.
            sub.sender
                .send(InsertEvent {
                    table: table.to_string(),
                    row: row.clone(),
                })
                .is_ok()
        });
    }

    /// Number of live subscriptions (test observability).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

#[async_trait]
impl ChangeFeed for LocalChangeFeed {
    async fn subscribe(&self, filter: ChannelFilter) -> Result<FeedSubscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().push(Subscriber {
            id,
            filter,
            sender: tx,
        });

        let subscribers = Arc::clone(&self.subscribers);
        Ok(FeedSubscription::new(rx, move || {
            subscribers.lock().unwrap().retain(|sub| sub.id != id);
        }))
    }
}

impl std::fmt::Debug for LocalChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalChangeFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_delivers_matching_inserts_in_order() {
        let feed = LocalChangeFeed::new();
        let mut sub = feed
            .subscribe(ChannelFilter::table_eq("messages", "conversation_id", "c1"))
            .await
            .unwrap();

        feed.publish("messages", json!({"conversation_id": "c1", "content": "first"}));
        feed.publish("messages", json!({"conversation_id": "c2", "content": "other"}));
        feed.publish("messages", json!({"conversation_id": "c1", "content": "second"}));

        assert_eq!(sub.next_event().await.unwrap().row["content"], "first");
        assert_eq!(sub.next_event().await.unwrap().row["content"], "second");
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let feed = LocalChangeFeed::new();
        let sub = feed
            .subscribe(ChannelFilter::table("notifications"))
            .await
            .unwrap();
        assert_eq!(feed.subscriber_count(), 1);

        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_close_unsubscribes() {
        let feed = LocalChangeFeed::new();
        let sub = feed
            .subscribe(ChannelFilter::table("notifications"))
            .await
            .unwrap();

        sub.close();
        assert_eq!(feed.subscriber_count(), 0);
    }
}
