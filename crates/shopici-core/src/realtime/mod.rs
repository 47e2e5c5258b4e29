//! Realtime change feed contract.
//!
//! The feed itself is a hosted external collaborator that pushes row-insert
//! events for a given table and filter. This module defines the consumed
//! contract: `subscribe(filter)` yields a cancellable handle whose events
//! the caller appends to an ordered local log. There is no replay and no
//! ordering guarantee across tables.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;

/// Scopes a subscription to one table, optionally narrowed to rows whose
/// `column` equals `value` (the only filter shape the storefront needs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFilter {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<(String, String)>,
}

impl ChannelFilter {
    /// Every insert on `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            eq: None,
        }
    }

    /// Inserts on `table` where `column` equals `value`.
    pub fn table_eq(
        table: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            eq: Some((column.into(), value.into())),
        }
    }

    /// True if a row of `table` passes this filter.
    pub fn matches(&self, table: &str, row: &serde_json::Value) -> bool {
        if self.table != table {
            return false;
        }
        match &self.eq {
            None => true,
            Some((column, value)) => match row.get(column) {
                Some(serde_json::Value::String(s)) => s == value,
                Some(other) => other.to_string() == *value,
                None => false,
            },
        }
    }
}

/// One row-insert event as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertEvent {
    pub table: String,
    /// The inserted row, as the backend serialized it.
    pub row: serde_json::Value,
}

impl InsertEvent {
    /// Decodes the row into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.row.clone())?)
    }
}

/// The consumed surface of the hosted realtime service.
#[async_trait::async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Opens a subscription for rows matching `filter`.
    async fn subscribe(&self, filter: ChannelFilter) -> Result<FeedSubscription>;
}

/// A cancellable subscription to insert events.
///
/// The subscription unsubscribes when dropped (release-on-exit-all-paths);
/// [`close`](Self::close) ends it early. Events received between the last
/// poll and release are discarded.
pub struct FeedSubscription {
    receiver: mpsc::UnboundedReceiver<InsertEvent>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl FeedSubscription {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<InsertEvent>,
        on_release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Waits for the next insert event. Returns `None` once the feed side
    /// has gone away.
    pub async fn next_event(&mut self) -> Option<InsertEvent> {
        self.receiver.recv().await
    }

    /// Non-blocking poll for a pending event.
    pub fn try_next(&mut self) -> Option<InsertEvent> {
        self.receiver.try_recv().ok()
    }

    /// Explicitly ends the subscription.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("released", &self.on_release.is_none())
            .finish()
    }
}
