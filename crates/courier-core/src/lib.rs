pub mod agents;
pub mod cache;
pub mod config;
pub mod error;
pub mod ids;
pub mod mentions;
pub mod messaging;
pub mod reconcile;
pub mod resolve;
pub mod side_index;
pub mod time;

#[cfg(test)]
mod tests;

use agents::AgentDirectory;
use cache::IdentityCache;
use config::CoreConfig;
use courier_api::types::ResolvedIdentity;
use courier_storage::LocalStore;
use error::CoreError;
use ids::{ConversationId, WalletAddress};
use mentions::{extract_mentions, MentionToken};
use messaging::{Conversation, MessagingClient};
use reconcile::ConversationReconciler;
use resolve::{is_ens_name, EnsResolver, FarcasterResolver, ResolutionPipeline, ResolveOptions};
use side_index::AddressSideIndex;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// What a user-typed token resolved to: a concrete wallet address, plus the
/// identity behind it when one of the resolvers produced it (a raw address
/// has none). Shown to the user for confirmation before any conversation is
/// touched.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTarget {
    pub address: WalletAddress,
    pub identity: Option<ResolvedIdentity>,
}

/// Session-scoped service object wiring the identity cache, resolution
/// pipeline, side-index and reconciler over injected collaborators. Created
/// at session start (wallet connect), disposed with `shutdown()` at
/// sign-out; nothing in here is a process-wide global.
#[derive(Clone)]
pub struct Core {
    config: CoreConfig,
    cache: IdentityCache,
    index: AddressSideIndex,
    reconciler: Arc<ConversationReconciler>,
    messaging: Arc<dyn MessagingClient>,
    poller: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Core {
    pub async fn init(
        config: CoreConfig,
        ens: Arc<dyn EnsResolver>,
        farcaster: Arc<dyn FarcasterResolver>,
        directory: AgentDirectory,
        messaging: Arc<dyn MessagingClient>,
    ) -> Result<Self, CoreError> {
        let store = LocalStore::open_or_create(&config.storage_path, &config.namespace)
            .map_err(|_| CoreError::Storage)?;
        let store = Arc::new(Mutex::new(store));
        let index = AddressSideIndex::new(store);
        let pipeline = Arc::new(ResolutionPipeline::new(ens, farcaster, directory));
        let cache = IdentityCache::new(pipeline);
        let reconciler = Arc::new(ConversationReconciler::new(messaging.clone(), index.clone()));
        let core = Self {
            config,
            cache,
            index,
            reconciler,
            messaging,
            poller: Arc::new(Mutex::new(None)),
        };
        if core.config.polling_interval_ms > 0 {
            core.start_sync_poller().await;
        }
        Ok(core)
    }

    /// Turns user input into a messaging target.
    ///
    /// `@mention` → tokenize and resolve with mention semantics;
    /// `name.eth` → ENS-only resolution; anything else must be a literal
    /// wallet address. Malformed input fails synchronously, before any
    /// network call.
    pub async fn resolve_input(&self, input: &str) -> Result<ResolvedTarget, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("empty input".to_string()));
        }
        if trimmed.starts_with('@') {
            let mentions = extract_mentions(trimmed);
            let token = mentions
                .first()
                .ok_or_else(|| CoreError::Validation("mention".to_string()))?;
            let identity = self
                .cache
                .resolve(&token.username, &ResolveOptions { is_mention: true })
                .await?;
            return Self::target_from_identity(identity);
        }
        if is_ens_name(trimmed) {
            let identity = self
                .cache
                .resolve(trimmed, &ResolveOptions { is_mention: false })
                .await?;
            return Self::target_from_identity(identity);
        }
        let address = WalletAddress::parse(trimmed)
            .ok_or_else(|| CoreError::Validation("address".to_string()))?;
        Ok(ResolvedTarget {
            address,
            identity: None,
        })
    }

    fn target_from_identity(
        identity: Option<ResolvedIdentity>,
    ) -> Result<ResolvedTarget, CoreError> {
        let identity = identity.ok_or(CoreError::NotFound)?;
        let address = identity
            .wallet_address
            .as_deref()
            .and_then(WalletAddress::parse)
            .ok_or(CoreError::NotFound)?;
        Ok(ResolvedTarget {
            address,
            identity: Some(identity),
        })
    }

    pub async fn find_or_create_conversation(
        &self,
        address: &WalletAddress,
    ) -> Result<Conversation, CoreError> {
        self.reconciler.find_or_create(address).await
    }

    /// Syncs with the network (best effort; local state still loads on sync
    /// failure), lists conversations and backfills missing peer addresses
    /// from the side-index.
    pub async fn refresh_conversations(&self) -> Result<Vec<Conversation>, CoreError> {
        if let Err(err) = self.messaging.sync_all().await {
            log::warn!("conversation sync failed: {}", err);
        }
        let mut conversations = self.messaging.list_dms().await?;
        self.reconciler
            .backfill_peer_addresses(&mut conversations)
            .await;
        Ok(conversations)
    }

    pub async fn send_message(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<String, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::Validation("empty message".to_string()));
        }
        self.messaging.send(conversation, text).await
    }

    pub async fn resolve_mentions_in_text(
        &self,
        text: &str,
    ) -> Vec<(MentionToken, Option<ResolvedIdentity>)> {
        self.cache.resolve_mentions_in_text(text).await
    }

    pub async fn preload_identities(&self, handles: &[String]) {
        self.cache.preload(handles).await;
    }

    pub async fn clear_identity_cache(&self) {
        self.cache.clear().await;
    }

    pub fn identity_cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn side_index(&self) -> &AddressSideIndex {
        &self.index
    }

    async fn start_sync_poller(&self) {
        let cloned = self.clone();
        let interval_ms = self.config.polling_interval_ms;
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_millis(interval_ms));
            loop {
                ticker.tick().await;
                let _ = cloned.refresh_conversations().await;
            }
        });
        *self.poller.lock().await = Some(handle);
    }

    /// Session disposal: stops the background poller. Safe to call more
    /// than once.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
        }
    }
}
