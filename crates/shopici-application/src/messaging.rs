//! Buyer-seller messaging and notification feeds.

use std::sync::Arc;

use tracing::{debug, warn};

use shopici_core::auth::IdentityService;
use shopici_core::conversation::{
    Conversation, ConversationRepository, Message, MessageRepository, NewConversation, NewMessage,
};
use shopici_core::error::{Result, StoreError};
use shopici_core::notification::{NewNotification, Notification, NotificationRepository};
use shopici_core::product::Product;
use shopici_core::realtime::{ChangeFeed, ChannelFilter, FeedSubscription};

/// Opening messages suggested by the contact-seller dialog.
pub const SUGGESTED_OPENERS: [&str; 5] = [
    "Bonjour, ce produit est-il toujours disponible ?",
    "Je suis intéressé par votre annonce.",
    "Pouvez-vous me donner plus de détails ?",
    "Est-ce possible d'avoir une remise ?",
    "Quel est l'état du produit ?",
];

/// Fallback opener when the buyer picks none.
pub const DEFAULT_OPENER: &str = "Hello, I'm interested in your product!";

/// Use case behind the chat, conversation and notification screens.
pub struct MessagingUseCase {
    identity: Arc<dyn IdentityService>,
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    notifications: Arc<dyn NotificationRepository>,
    feed: Arc<dyn ChangeFeed>,
}

impl MessagingUseCase {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
        notifications: Arc<dyn NotificationRepository>,
        feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            identity,
            conversations,
            messages,
            notifications,
            feed,
        }
    }

    /// Opens (or reuses) the conversation between the signed-in buyer and a
    /// product's seller.
    ///
    /// An existing conversation is returned as-is; a new one is created
    /// with the chosen opening message, and the seller is notified.
    pub async fn contact_seller(
        &self,
        product: &Product,
        opener: Option<&str>,
    ) -> Result<Conversation> {
        let buyer_id = self.require_user().await?;
        if buyer_id == product.user_id {
            return Err(StoreError::validation(
                "cannot start a conversation on your own listing",
            ));
        }

        if let Some(existing) = self
            .conversations
            .find_between(&buyer_id, &product.user_id, &product.id)
            .await?
        {
            debug!(conversation_id = %existing.id, "reusing existing conversation");
            return Ok(existing);
        }

        let conversation = self
            .conversations
            .insert(&NewConversation {
                buyer_id: buyer_id.clone(),
                seller_id: product.user_id.clone(),
                product_id: product.id.clone(),
            })
            .await?;

        let content = opener.unwrap_or(DEFAULT_OPENER);
        self.messages
            .insert(&NewMessage {
                conversation_id: conversation.id.clone(),
                sender_id: buyer_id,
                content: content.to_string(),
            })
            .await?;
        self.notify(&conversation.seller_id, &format!("New message about \"{}\"", product.title))
            .await;

        Ok(conversation)
    }

    /// Every conversation the signed-in user participates in.
    pub async fn my_conversations(&self) -> Result<Vec<Conversation>> {
        let user_id = self.require_user().await?;
        self.conversations.list_for_user(&user_id).await
    }

    /// Full message log of a conversation, oldest first.
    pub async fn conversation_log(&self, conversation_id: &str) -> Result<Vec<Message>> {
        self.messages.list_for_conversation(conversation_id).await
    }

    /// Sends a message into a conversation the signed-in user participates
    /// in, and notifies the counterpart.
    pub async fn send_message(&self, conversation: &Conversation, content: &str) -> Result<Message> {
        let sender_id = self.require_user().await?;
        if !conversation.involves(&sender_id) {
            return Err(StoreError::security(
                "only participants can post to a conversation",
            ));
        }

        let message = self
            .messages
            .insert(&NewMessage {
                conversation_id: conversation.id.clone(),
                sender_id: sender_id.clone(),
                content: content.to_string(),
            })
            .await?;
        self.notify(conversation.counterpart(&sender_id), "You have a new message")
            .await;
        Ok(message)
    }

    /// Deletes a conversation (either participant may).
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        self.require_user().await?;
        self.conversations.delete(conversation_id).await
    }

    /// Unread-first notification list for the signed-in user.
    pub async fn my_notifications(&self) -> Result<Vec<Notification>> {
        let user_id = self.require_user().await?;
        self.notifications.list_for_user(&user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.notifications.mark_read(id).await
    }

    /// Live message log for one conversation.
    ///
    /// The subscription ends when the returned feed is dropped; screens
    /// keep it for exactly as long as they are on screen.
    pub async fn open_message_feed(&self, conversation_id: &str) -> Result<MessageFeed> {
        let subscription = self
            .feed
            .subscribe(ChannelFilter::table_eq(
                "messages",
                "conversation_id",
                conversation_id,
            ))
            .await?;
        Ok(EventLog::new(subscription))
    }

    /// Live notification log for the signed-in user.
    pub async fn open_notification_feed(&self) -> Result<NotificationFeed> {
        let user_id = self.require_user().await?;
        let subscription = self
            .feed
            .subscribe(ChannelFilter::table_eq("notifications", "user_id", &user_id))
            .await?;
        Ok(EventLog::new(subscription))
    }

    /// Best-effort notification row; a failure here must not fail the send
    /// that triggered it.
    async fn notify(&self, user_id: &str, body: &str) {
        let draft = NewNotification {
            user_id: user_id.to_string(),
            body: body.to_string(),
        };
        if let Err(err) = self.notifications.insert(&draft).await {
            warn!("failed to record notification: {err}");
        }
    }

    async fn require_user(&self) -> Result<String> {
        self.identity
            .session()
            .await?
            .map(|s| s.user.id)
            .ok_or_else(|| StoreError::security("sign in to use messaging"))
    }
}

/// An append-only, insertion-ordered log fed by a realtime subscription.
///
/// Each received insert event is decoded and appended; rows that fail to
/// decode are dropped with a warning rather than poisoning the log. The
/// underlying subscription is released when the log is dropped.
pub struct EventLog<T> {
    subscription: FeedSubscription,
    entries: Vec<T>,
}

/// Live log of [`Message`] rows for one conversation.
pub type MessageFeed = EventLog<Message>;

/// Live log of [`Notification`] rows for one user.
pub type NotificationFeed = EventLog<Notification>;

impl<T: serde::de::DeserializeOwned> EventLog<T> {
    fn new(subscription: FeedSubscription) -> Self {
        Self {
            subscription,
            entries: Vec::new(),
        }
    }

    /// Drains every already-delivered event into the log and returns the
    /// full log.
    pub fn poll(&mut self) -> &[T] {
        while let Some(event) = self.subscription.try_next() {
            match event.decode::<T>() {
                Ok(entry) => self.entries.push(entry),
                Err(err) => warn!("dropping undecodable feed event: {err}"),
            }
        }
        &self.entries
    }

    /// Waits for the next decodable event, appends it, and returns a
    /// reference to it. Returns `None` once the feed has gone away.
    pub async fn next(&mut self) -> Option<&T> {
        loop {
            let event = self.subscription.next_event().await?;
            match event.decode::<T>() {
                Ok(entry) => {
                    self.entries.push(entry);
                    return self.entries.last();
                }
                Err(err) => warn!("dropping undecodable feed event: {err}"),
            }
        }
    }

    /// Everything received so far, in delivery order.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Ends the subscription early, keeping the collected entries.
    pub fn close(self) -> Vec<T> {
        self.subscription.close();
        self.entries
    }
}

impl<T> std::fmt::Debug for EventLog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("entries", &self.entries.len())
            .finish()
    }
}
