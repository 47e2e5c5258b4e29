//! In-memory row storage implementing every repository trait.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use shopici_core::conversation::{
    Conversation, ConversationRepository, Message, MessageRepository, NewConversation, NewMessage,
};
use shopici_core::error::Result;
use shopici_core::notification::{NewNotification, Notification, NotificationRepository};
use shopici_core::product::{NewProduct, Product, ProductRepository, ProductStatus};
use shopici_core::profile::{Profile, ProfileRepository};

use super::feed::LocalChangeFeed;

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    profiles: Vec<Profile>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
}

/// All five row tables behind one lock, with insert events optionally
/// republished to a [`LocalChangeFeed`] the way the hosted backend feeds
/// its realtime channel from table writes.
#[derive(Clone, Default)]
pub struct MemoryDataService {
    tables: Arc<RwLock<Tables>>,
    feed: Option<LocalChangeFeed>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires a change feed that will observe message and notification
    /// inserts.
    pub fn with_feed(feed: LocalChangeFeed) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            feed: Some(feed),
        }
    }

    /// Seeds a product row directly (test setup).
    pub fn seed_product(&self, product: Product) {
        self.tables.write().unwrap().products.push(product);
    }

    /// Seeds a profile row directly (test setup).
    pub fn seed_profile(&self, profile: Profile) {
        self.tables.write().unwrap().profiles.push(profile);
    }

    fn publish(&self, table: &str, row: serde_json::Value) {
        if let Some(feed) = &self.feed {
            feed.publish(table, row);
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryDataService {
    async fn list_active(&self) -> Result<Vec<Product>> {
        let tables = self.tables.read().unwrap();
        let mut rows: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_by_seller(&self, user_id: &str) -> Result<Vec<Product>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .products
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let tables = self.tables.read().unwrap();
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, draft: &NewProduct) -> Result<Product> {
        let row = Product {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            price: draft.price,
            category: draft.category,
            image_urls: draft.image_urls.clone(),
            status: draft.status,
            created_at: draft.created_at,
        };
        self.tables.write().unwrap().products.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.tables
            .write()
            .unwrap()
            .products
            .retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryDataService {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>> {
        let tables = self.tables.read().unwrap();
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn upsert(&self, profile: &Profile) -> Result<()> {
        let mut tables = self.tables.write().unwrap();
        match tables.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile.clone(),
            None => tables.profiles.push(profile.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationRepository for MemoryDataService {
    async fn find_between(
        &self,
        buyer_id: &str,
        seller_id: &str,
        product_id: &str,
    ) -> Result<Option<Conversation>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .conversations
            .iter()
            .find(|c| {
                c.buyer_id == buyer_id && c.seller_id == seller_id && c.product_id == product_id
            })
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .conversations
            .iter()
            .filter(|c| c.involves(user_id))
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: &NewConversation) -> Result<Conversation> {
        let row = Conversation {
            id: Uuid::new_v4().to_string(),
            buyer_id: draft.buyer_id.clone(),
            seller_id: draft.seller_id.clone(),
            product_id: draft.product_id.clone(),
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .unwrap()
            .conversations
            .push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().unwrap();
        tables.conversations.retain(|c| c.id != id);
        tables.messages.retain(|m| m.conversation_id != id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryDataService {
    async fn list_for_conversation(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let tables = self.tables.read().unwrap();
        let mut rows: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn insert(&self, draft: &NewMessage) -> Result<Message> {
        let row = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: draft.conversation_id.clone(),
            sender_id: draft.sender_id.clone(),
            content: draft.content.clone(),
            created_at: Utc::now(),
        };
        self.tables.write().unwrap().messages.push(row.clone());
        self.publish("messages", serde_json::to_value(&row)?);
        Ok(row)
    }
}

#[async_trait]
impl NotificationRepository for MemoryDataService {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let tables = self.tables.read().unwrap();
        let mut rows: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, draft: &NewNotification) -> Result<Notification> {
        let row = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id.clone(),
            body: draft.body.clone(),
            read: false,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .unwrap()
            .notifications
            .push(row.clone());
        self.publish("notifications", serde_json::to_value(&row)?);
        Ok(row)
    }

    async fn mark_read(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().unwrap();
        if let Some(row) = tables.notifications.iter_mut().find(|n| n.id == id) {
            row.read = true;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read().unwrap();
        f.debug_struct("MemoryDataService")
            .field("products", &tables.products.len())
            .field("profiles", &tables.profiles.len())
            .field("conversations", &tables.conversations.len())
            .field("messages", &tables.messages.len())
            .field("notifications", &tables.notifications.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shopici_core::product::ProductCategory;
    use shopici_core::realtime::{ChangeFeed, ChannelFilter};

    fn product(id: &str, status: ProductStatus, age_minutes: i64) -> Product {
        Product {
            id: id.to_string(),
            user_id: "seller-1".into(),
            title: format!("Product {id}"),
            description: "desc".into(),
            price: 10.0,
            category: ProductCategory::Home,
            image_urls: None,
            status,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_list_active_filters_and_orders_newest_first() {
        let data = MemoryDataService::new();
        data.seed_product(product("p-old", ProductStatus::Active, 60));
        data.seed_product(product("p-hidden", ProductStatus::Inactive, 30));
        data.seed_product(product("p-new", ProductStatus::Active, 5));

        let rows = data.list_active().await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p-new", "p-old"]);
    }

    #[tokio::test]
    async fn test_message_insert_reaches_change_feed() {
        let feed = LocalChangeFeed::new();
        let data = MemoryDataService::with_feed(feed.clone());
        let mut sub = feed
            .subscribe(ChannelFilter::table_eq("messages", "conversation_id", "c1"))
            .await
            .unwrap();

        MessageRepository::insert(
            &data,
            &NewMessage {
                conversation_id: "c1".into(),
                sender_id: "u1".into(),
                content: "hello".into(),
            },
        )
        .await
        .unwrap();

        let event = sub.next_event().await.unwrap();
        let message: Message = event.decode().unwrap();
        assert_eq!(message.content, "hello");
    }

    #[tokio::test]
    async fn test_deleting_conversation_drops_its_messages() {
        let data = MemoryDataService::new();
        let conversation = ConversationRepository::insert(
            &data,
            &NewConversation {
                buyer_id: "b".into(),
                seller_id: "s".into(),
                product_id: "p".into(),
            },
        )
        .await
        .unwrap();
        MessageRepository::insert(
            &data,
            &NewMessage {
                conversation_id: conversation.id.clone(),
                sender_id: "b".into(),
                content: "hi".into(),
            },
        )
        .await
        .unwrap();

        ConversationRepository::delete(&data, &conversation.id)
            .await
            .unwrap();

        assert!(
            data.list_for_conversation(&conversation.id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
