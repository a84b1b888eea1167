use super::{
    agent, base_config, farcaster_user, temp_path, MockEns, MockFarcaster, ADDR_A, ADDR_B,
};
use crate::agents::AgentDirectory;
use crate::config::CoreConfig;
use crate::ids::{ConversationId, InboxId, WalletAddress};
use crate::messaging::{Conversation, MockMessaging};
use crate::time::now_ms;
use crate::Core;
use courier_api::types::IdentitySource;
use std::sync::Arc;
use std::time::Duration;

async fn build_core(
    label: &str,
    ens: &MockEns,
    farcaster: &MockFarcaster,
    directory: AgentDirectory,
    messaging: &MockMessaging,
) -> Core {
    Core::init(
        base_config(temp_path(label)),
        Arc::new(ens.clone()),
        Arc::new(farcaster.clone()),
        directory,
        Arc::new(messaging.clone()),
    )
    .await
    .expect("core")
}

#[tokio::test]
async fn resolve_input_handles_mentions() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    farcaster
        .insert(farcaster_user("alice", 1, Some(ADDR_A), &[]))
        .await;
    let core = build_core(
        "input-mention",
        &ens,
        &farcaster,
        AgentDirectory::default(),
        &MockMessaging::new(),
    )
    .await;

    let target = core.resolve_input("@alice").await.unwrap();
    assert_eq!(target.address.as_str(), ADDR_A);
    assert_eq!(
        target.identity.unwrap().source,
        IdentitySource::Farcaster
    );
}

#[tokio::test]
async fn resolve_input_routes_bare_ens_names_to_ens() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    ens.insert("vitalik.eth", ADDR_B).await;
    let core = build_core(
        "input-ens",
        &ens,
        &farcaster,
        AgentDirectory::default(),
        &MockMessaging::new(),
    )
    .await;

    let target = core.resolve_input("vitalik.eth").await.unwrap();
    assert_eq!(target.address.as_str(), ADDR_B);
    assert_eq!(target.identity.unwrap().source, IdentitySource::Ens);
    assert_eq!(farcaster.count().await, 0);
}

#[tokio::test]
async fn resolve_input_accepts_raw_addresses_without_lookups() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    let core = build_core(
        "input-raw",
        &ens,
        &farcaster,
        AgentDirectory::default(),
        &MockMessaging::new(),
    )
    .await;

    let target = core
        .resolve_input(" 0x00000000000000000000000000000000000000AA ")
        .await
        .unwrap();
    assert_eq!(target.address.as_str(), ADDR_A);
    assert!(target.identity.is_none());
    assert_eq!(ens.count().await, 0);
    assert_eq!(farcaster.count().await, 0);
}

#[tokio::test]
async fn resolve_input_uses_directory_for_agent_mentions() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    let directory = AgentDirectory::new(vec![agent("helper", ADDR_B)]);
    let core = build_core(
        "input-agent",
        &ens,
        &farcaster,
        directory,
        &MockMessaging::new(),
    )
    .await;

    let target = core.resolve_input("@helper").await.unwrap();
    assert_eq!(target.address.as_str(), ADDR_B);
    assert_eq!(
        target.identity.unwrap().source,
        IdentitySource::Directory
    );
}

#[tokio::test]
async fn end_to_end_mention_to_conversation() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    farcaster
        .insert(farcaster_user("alice", 1, Some(ADDR_A), &[]))
        .await;
    let messaging = MockMessaging::new();
    let core = build_core(
        "end-to-end",
        &ens,
        &farcaster,
        AgentDirectory::default(),
        &messaging,
    )
    .await;
    let target = core.resolve_input("@alice").await.unwrap();
    messaging
        .register_identity(&target.address, InboxId::new("inbox-alice"))
        .await;

    let conversation = core
        .find_or_create_conversation(&target.address)
        .await
        .unwrap();
    assert_eq!(conversation.peer_address.as_deref(), Some(ADDR_A));
    let id = core
        .send_message(&conversation.id, "hi alice")
        .await
        .unwrap();
    assert!(!id.is_empty());

    // the refreshed list carries the repaired peer address
    let listed = core.refresh_conversations().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].peer_address.as_deref(), Some(ADDR_A));
}

#[tokio::test]
async fn refresh_backfills_missing_peer_addresses() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    let messaging = MockMessaging::new();
    messaging
        .add_conversation(Conversation {
            id: ConversationId::new("conv-1"),
            peer_address: None,
            peer_inbox_id: None,
            created_at_ms: now_ms(),
        })
        .await;
    let core = build_core(
        "refresh",
        &ens,
        &farcaster,
        AgentDirectory::default(),
        &messaging,
    )
    .await;
    core.side_index()
        .set(
            &ConversationId::new("conv-1"),
            &WalletAddress::parse(ADDR_A).unwrap(),
        )
        .await
        .unwrap();

    let conversations = core.refresh_conversations().await.unwrap();
    assert_eq!(conversations[0].peer_address.as_deref(), Some(ADDR_A));
}

#[tokio::test]
async fn poller_syncs_until_shutdown() {
    let ens = MockEns::new();
    let farcaster = MockFarcaster::new();
    let messaging = MockMessaging::new();
    let config = CoreConfig {
        polling_interval_ms: 20,
        ..base_config(temp_path("poller"))
    };
    let core = Core::init(
        config,
        Arc::new(ens),
        Arc::new(farcaster),
        AgentDirectory::default(),
        Arc::new(messaging.clone()),
    )
    .await
    .expect("core");

    tokio::time::sleep(Duration::from_millis(90)).await;
    let synced = messaging.sync_count().await;
    assert!(synced >= 2, "expected repeated syncs, saw {}", synced);

    core.shutdown().await;
    let after_shutdown = messaging.sync_count().await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(messaging.sync_count().await, after_shutdown);
}
