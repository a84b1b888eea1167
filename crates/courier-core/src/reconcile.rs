use crate::error::CoreError;
use crate::ids::WalletAddress;
use crate::messaging::{Conversation, MessagingClient};
use crate::side_index::AddressSideIndex;
use std::sync::Arc;

/// Finds the conversation for a target address, or creates one.
///
/// Search order, first match wins, each step only attempted when the prior
/// steps found nothing:
///   1. side-index entry whose address matches and whose conversation is
///      still in the locally loaded set;
///   2. a loaded conversation whose peer address matches;
///   3. inbox-id lookup through the messaging client, matched against
///      loaded conversations' peer inbox ids;
///   4. scan of every loaded conversation's messages for a sender address
///      match — a hit also repairs the side-index;
///   5. protocol-level creation from the inbox id obtained in step 3.
pub struct ConversationReconciler {
    messaging: Arc<dyn MessagingClient>,
    index: AddressSideIndex,
}

impl ConversationReconciler {
    pub fn new(messaging: Arc<dyn MessagingClient>, index: AddressSideIndex) -> Self {
        Self { messaging, index }
    }

    pub async fn find_or_create(
        &self,
        target: &WalletAddress,
    ) -> Result<Conversation, CoreError> {
        let conversations = self.messaging.list_dms().await?;

        let indexed = self.index.all().await;
        for (conversation_id, address) in indexed.iter() {
            if !target.matches(address) {
                continue;
            }
            if let Some(existing) = conversations
                .iter()
                .find(|c| c.id.value == *conversation_id)
            {
                return Ok(with_peer_address(existing.clone(), target));
            }
        }

        if let Some(existing) = conversations.iter().find(|c| {
            c.peer_address
                .as_deref()
                .map(|address| target.matches(address))
                .unwrap_or(false)
        }) {
            return Ok(existing.clone());
        }

        let inbox = match self.messaging.inbox_id_for_address(target).await {
            Ok(inbox) => inbox,
            Err(err) => {
                log::warn!("inbox lookup failed for {}: {}", target, err);
                None
            }
        };
        if let Some(inbox_id) = inbox.as_ref() {
            if let Some(existing) = conversations
                .iter()
                .find(|c| c.peer_inbox_id.as_ref() == Some(inbox_id))
            {
                return Ok(with_peer_address(existing.clone(), target));
            }
        }

        for conversation in conversations.iter() {
            let messages = match self.messaging.messages(&conversation.id).await {
                Ok(messages) => messages,
                Err(err) => {
                    log::debug!("message scan skipped {}: {}", conversation.id.value, err);
                    continue;
                }
            };
            let sender_match = messages.iter().any(|message| {
                message
                    .sender_address
                    .as_deref()
                    .map(|address| target.matches(address))
                    .unwrap_or(false)
            });
            if sender_match {
                self.index.set(&conversation.id, target).await?;
                return Ok(with_peer_address(conversation.clone(), target));
            }
        }

        let inbox_id = match inbox {
            Some(inbox_id) => inbox_id,
            None => return Err(self.unresolvable(target).await),
        };
        let conversation = self.messaging.new_dm(&inbox_id).await?;
        self.index.set(&conversation.id, target).await?;
        Ok(with_peer_address(conversation, target))
    }

    /// Distinguishes "peer is not on the network" from "the lookup glitched";
    /// the two carry different guidance. If the reachability check itself
    /// fails, transient-failure guidance is the safe default.
    async fn unresolvable(&self, target: &WalletAddress) -> CoreError {
        match self.messaging.can_message(target).await {
            Ok(false) => CoreError::PeerUnregistered,
            Ok(true) => CoreError::InboxLookup(target.short()),
            Err(err) => CoreError::InboxLookup(err.to_string()),
        }
    }

    /// List-render-time repair: fills in missing peer addresses from the
    /// side-index.
    pub async fn backfill_peer_addresses(&self, conversations: &mut [Conversation]) {
        let indexed = self.index.all().await;
        for conversation in conversations.iter_mut() {
            if conversation.peer_address.is_none() {
                if let Some(address) = indexed.get(&conversation.id.value) {
                    conversation.peer_address = Some(address.clone());
                }
            }
        }
    }
}

fn with_peer_address(mut conversation: Conversation, target: &WalletAddress) -> Conversation {
    if conversation.peer_address.is_none() {
        conversation.peer_address = Some(target.as_str().to_string());
    }
    conversation
}
