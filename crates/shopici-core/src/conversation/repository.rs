//! Conversation and message repository traits.

use async_trait::async_trait;

use super::model::{Conversation, Message, NewConversation, NewMessage};
use crate::error::Result;

/// An abstract repository over the remote `conversations` table.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// The unique conversation for a (buyer, seller, product) triple, if it
    /// exists.
    async fn find_between(
        &self,
        buyer_id: &str,
        seller_id: &str,
        product_id: &str,
    ) -> Result<Option<Conversation>>;

    /// Every conversation the user participates in, as buyer or seller.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>>;

    /// Inserts a draft and returns the stored row with its assigned id.
    async fn insert(&self, draft: &NewConversation) -> Result<Conversation>;

    /// Deletes a conversation by row id.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// An abstract repository over the remote `messages` table.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages of a conversation, oldest first.
    async fn list_for_conversation(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Inserts a draft and returns the stored row with its assigned id.
    async fn insert(&self, draft: &NewMessage) -> Result<Message>;
}
