//! Conversation and message models.
//!
//! A conversation ties one buyer, one seller and one product together;
//! messages hang off a conversation and form an append-only, time-ordered
//! log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the remote `conversations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// True if the given user participates in this conversation.
    pub fn involves(&self, user_id: &str) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }

    /// The participant that is not `user_id`.
    pub fn counterpart(&self, user_id: &str) -> &str {
        if self.buyer_id == user_id {
            &self.seller_id
        } else {
            &self.buyer_id
        }
    }
}

/// Draft for creating a conversation; the backend assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConversation {
    pub buyer_id: String,
    pub seller_id: String,
    pub product_id: String,
}

/// A row of the remote `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Draft for sending a message; the backend assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
}
