//! PostgREST-backed repository implementations.

use std::sync::Arc;

use async_trait::async_trait;

use shopici_core::conversation::{
    Conversation, ConversationRepository, Message, MessageRepository, NewConversation, NewMessage,
};
use shopici_core::error::Result;
use shopici_core::notification::{NewNotification, Notification, NotificationRepository};
use shopici_core::product::{NewProduct, Product, ProductRepository};
use shopici_core::profile::{Profile, ProfileRepository};

use super::client::{RestClient, eq};

/// `products` table over PostgREST.
pub struct RestProductRepository {
    client: Arc<RestClient>,
}

impl RestProductRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductRepository for RestProductRepository {
    async fn list_active(&self) -> Result<Vec<Product>> {
        self.client
            .select(
                "products",
                &[
                    ("status", eq("active")),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn list_by_seller(&self, user_id: &str) -> Result<Vec<Product>> {
        self.client
            .select("products", &[("user_id", eq(user_id))])
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let rows: Vec<Product> = self.client.select("products", &[("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, draft: &NewProduct) -> Result<Product> {
        self.client.insert("products", draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete("products", &[("id", eq(id))]).await
    }
}

/// `profiles` table over PostgREST.
pub struct RestProfileRepository {
    client: Arc<RestClient>,
}

impl RestProfileRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>> {
        let rows: Vec<Profile> = self.client.select("profiles", &[("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let rows: Vec<Profile> = self
            .client
            .select("profiles", &[("username", eq(username))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert(&self, profile: &Profile) -> Result<()> {
        self.client.upsert("profiles", profile).await
    }
}

/// `conversations` table over PostgREST.
pub struct RestConversationRepository {
    client: Arc<RestClient>,
}

impl RestConversationRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConversationRepository for RestConversationRepository {
    async fn find_between(
        &self,
        buyer_id: &str,
        seller_id: &str,
        product_id: &str,
    ) -> Result<Option<Conversation>> {
        let rows: Vec<Conversation> = self
            .client
            .select(
                "conversations",
                &[
                    ("buyer_id", eq(buyer_id)),
                    ("seller_id", eq(seller_id)),
                    ("product_id", eq(product_id)),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>> {
        self.client
            .select(
                "conversations",
                &[(
                    "or",
                    format!("(buyer_id.eq.{user_id},seller_id.eq.{user_id})"),
                )],
            )
            .await
    }

    async fn insert(&self, draft: &NewConversation) -> Result<Conversation> {
        self.client.insert("conversations", draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete("conversations", &[("id", eq(id))]).await
    }
}

/// `messages` table over PostgREST.
pub struct RestMessageRepository {
    client: Arc<RestClient>,
}

impl RestMessageRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageRepository for RestMessageRepository {
    async fn list_for_conversation(&self, conversation_id: &str) -> Result<Vec<Message>> {
        self.client
            .select(
                "messages",
                &[
                    ("conversation_id", eq(conversation_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await
    }

    async fn insert(&self, draft: &NewMessage) -> Result<Message> {
        self.client.insert("messages", draft).await
    }
}

/// `notifications` table over PostgREST.
pub struct RestNotificationRepository {
    client: Arc<RestClient>,
}

impl RestNotificationRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationRepository for RestNotificationRepository {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.client
            .select(
                "notifications",
                &[
                    ("user_id", eq(user_id)),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn insert(&self, draft: &NewNotification) -> Result<Notification> {
        self.client.insert("notifications", draft).await
    }

    async fn mark_read(&self, id: &str) -> Result<()> {
        self.client
            .update(
                "notifications",
                &[("id", eq(id))],
                &serde_json::json!({ "read": true }),
            )
            .await
    }
}
