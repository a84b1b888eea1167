use crate::error::CoreError;
use crate::ids::{ConversationId, InboxId, WalletAddress};
use crate::time::now_ms;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Canonical view of a messaging-library conversation. The library's own
/// objects vary across SDK revisions; everything behind the
/// `MessagingClient` seam is normalized into this one shape, and
/// `peer_address` is the field the library omits often enough that the
/// side-index exists to repair it.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    pub peer_address: Option<String>,
    pub peer_inbox_id: Option<InboxId>,
    pub created_at_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub sender_address: Option<String>,
    pub sender_inbox_id: Option<InboxId>,
    pub text: String,
    pub sent_at_ms: u64,
}

/// Capability interface over the external messaging SDK. Conversation
/// storage, encryption and streaming live on the other side of this trait.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn sync_all(&self) -> Result<(), CoreError>;
    async fn list_dms(&self) -> Result<Vec<Conversation>, CoreError>;
    async fn messages(&self, conversation: &ConversationId) -> Result<Vec<Message>, CoreError>;
    async fn send(&self, conversation: &ConversationId, text: &str) -> Result<String, CoreError>;
    async fn inbox_id_for_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<InboxId>, CoreError>;
    async fn can_message(&self, address: &WalletAddress) -> Result<bool, CoreError>;
    async fn new_dm(&self, inbox: &InboxId) -> Result<Conversation, CoreError>;
}

#[derive(Default)]
struct MockState {
    conversations: Vec<Conversation>,
    messages: HashMap<String, Vec<Message>>,
    identities: HashMap<String, InboxId>,
    reachable: HashSet<String>,
    inbox_lookups: usize,
    created: usize,
    syncs: usize,
}

/// In-memory messaging network for tests, the CLI and the daemon when no
/// real SDK binding is wired. Newly created DMs deliberately carry no
/// `peer_address`, matching the library behavior the side-index repairs.
#[derive(Clone, Default)]
pub struct MockMessaging {
    state: Arc<Mutex<MockState>>,
}

impl MockMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_conversation(&self, conversation: Conversation) {
        self.state.lock().await.conversations.push(conversation);
    }

    pub async fn add_message(&self, conversation: &ConversationId, message: Message) {
        self.state
            .lock()
            .await
            .messages
            .entry(conversation.value.clone())
            .or_default()
            .push(message);
    }

    /// Makes an address fully known to the network: reachable and with a
    /// resolvable inbox id.
    pub async fn register_identity(&self, address: &WalletAddress, inbox: InboxId) {
        let mut state = self.state.lock().await;
        state.identities.insert(address.as_str().to_string(), inbox);
        state.reachable.insert(address.as_str().to_string());
    }

    /// Makes an address reachable without a resolvable inbox id, the state
    /// that distinguishes a transient lookup failure from an unregistered
    /// peer.
    pub async fn mark_reachable(&self, address: &WalletAddress) {
        self.state
            .lock()
            .await
            .reachable
            .insert(address.as_str().to_string());
    }

    pub async fn inbox_lookup_count(&self) -> usize {
        self.state.lock().await.inbox_lookups
    }

    pub async fn created_count(&self) -> usize {
        self.state.lock().await.created
    }

    pub async fn sync_count(&self) -> usize {
        self.state.lock().await.syncs
    }
}

#[async_trait]
impl MessagingClient for MockMessaging {
    async fn sync_all(&self) -> Result<(), CoreError> {
        self.state.lock().await.syncs += 1;
        Ok(())
    }

    async fn list_dms(&self) -> Result<Vec<Conversation>, CoreError> {
        Ok(self.state.lock().await.conversations.clone())
    }

    async fn messages(&self, conversation: &ConversationId) -> Result<Vec<Message>, CoreError> {
        Ok(self
            .state
            .lock()
            .await
            .messages
            .get(&conversation.value)
            .cloned()
            .unwrap_or_default())
    }

    async fn send(&self, conversation: &ConversationId, text: &str) -> Result<String, CoreError> {
        let mut state = self.state.lock().await;
        if !state
            .conversations
            .iter()
            .any(|c| c.id == *conversation)
        {
            return Err(CoreError::NotFound);
        }
        let id = Uuid::new_v4().to_string();
        state
            .messages
            .entry(conversation.value.clone())
            .or_default()
            .push(Message {
                id: id.clone(),
                sender_address: None,
                sender_inbox_id: None,
                text: text.to_string(),
                sent_at_ms: now_ms(),
            });
        Ok(id)
    }

    async fn inbox_id_for_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<InboxId>, CoreError> {
        let mut state = self.state.lock().await;
        state.inbox_lookups += 1;
        Ok(state.identities.get(address.as_str()).cloned())
    }

    async fn can_message(&self, address: &WalletAddress) -> Result<bool, CoreError> {
        let state = self.state.lock().await;
        Ok(state.reachable.contains(address.as_str())
            || state.identities.contains_key(address.as_str()))
    }

    async fn new_dm(&self, inbox: &InboxId) -> Result<Conversation, CoreError> {
        let mut state = self.state.lock().await;
        state.created += 1;
        let conversation = Conversation {
            id: ConversationId::new(Uuid::new_v4().to_string()),
            peer_address: None,
            peer_inbox_id: Some(inbox.clone()),
            created_at_ms: now_ms(),
        };
        state.conversations.push(conversation.clone());
        Ok(conversation)
    }
}
