//! Buyer-seller messaging domain.

pub mod model;
pub mod repository;

pub use model::{Conversation, Message, NewConversation, NewMessage};
pub use repository::{ConversationRepository, MessageRepository};
