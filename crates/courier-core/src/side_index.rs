use crate::error::CoreError;
use crate::ids::{ConversationId, WalletAddress};
use courier_storage::LocalStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const INDEX_KEY: &str = "conversation_addresses";

/// Persisted `conversation id → wallet address` map.
///
/// The messaging library's locally cached conversation objects do not
/// reliably retain a human-readable peer address, so every conversation
/// created or discovered through this system records one here. Entries live
/// until `clear()`; there is no TTL.
#[derive(Clone)]
pub struct AddressSideIndex {
    store: Arc<Mutex<LocalStore>>,
}

impl AddressSideIndex {
    pub fn new(store: Arc<Mutex<LocalStore>>) -> Self {
        Self { store }
    }

    pub async fn get(&self, conversation: &ConversationId) -> Option<String> {
        let store = self.store.lock().await;
        Self::load(&store).get(&conversation.value).cloned()
    }

    /// Records the address for a conversation, lowercased so later matching
    /// is a plain equality check.
    pub async fn set(
        &self,
        conversation: &ConversationId,
        address: &WalletAddress,
    ) -> Result<(), CoreError> {
        let mut store = self.store.lock().await;
        let mut map = Self::load(&store);
        map.insert(conversation.value.clone(), address.as_str().to_string());
        Self::persist(&mut store, &map)
    }

    pub async fn all(&self) -> HashMap<String, String> {
        let store = self.store.lock().await;
        Self::load(&store)
    }

    pub async fn clear(&self) -> Result<(), CoreError> {
        let mut store = self.store.lock().await;
        store.remove(INDEX_KEY).map_err(|_| CoreError::Storage)
    }

    fn load(store: &LocalStore) -> HashMap<String, String> {
        store
            .get(INDEX_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    fn persist(
        store: &mut LocalStore,
        map: &HashMap<String, String>,
    ) -> Result<(), CoreError> {
        let value = serde_json::to_value(map).map_err(|_| CoreError::Storage)?;
        store.put(INDEX_KEY, value).map_err(|_| CoreError::Storage)
    }
}
