
use crate::routes::DaemonState;
use async_trait::async_trait;
use bytes::Bytes;
use courier_api::types::FarcasterUser;
use courier_core::agents::AgentDirectory;
use courier_core::config::CoreConfig;
use courier_core::error::CoreError;
use courier_core::messaging::MockMessaging;
use courier_core::resolve::{EnsResolver, FarcasterResolver};
use courier_core::Core;
use courier_lookup::InboxDirectory;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const ADDR_A: &str = "0x00000000000000000000000000000000000000aa";

#[derive(Clone, Default)]
pub struct StubEns {
    names: HashMap<String, String>,
}

impl StubEns {
    pub fn with(name: &str, address: &str) -> Self {
        let mut names = HashMap::new();
        names.insert(name.to_string(), address.to_string());
        Self { names }
    }
}

#[async_trait]
impl EnsResolver for StubEns {
    async fn resolve_name(&self, name: &str) -> Result<Option<String>, CoreError> {
        Ok(self.names.get(&name.to_ascii_lowercase()).cloned())
    }
}

#[derive(Clone, Default)]
pub struct StubFarcaster {
    users: HashMap<String, FarcasterUser>,
}

impl StubFarcaster {
    pub fn with(user: FarcasterUser) -> Self {
        let mut users = HashMap::new();
        users.insert(user.username.to_ascii_lowercase(), user);
        Self { users }
    }
}

#[async_trait]
impl FarcasterResolver for StubFarcaster {
    async fn user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<FarcasterUser>, CoreError> {
        Ok(self.users.get(&username.to_ascii_lowercase()).cloned())
    }
}

#[derive(Clone, Default)]
pub struct StubInbox {
    inboxes: HashMap<String, String>,
}

impl StubInbox {
    pub fn with(address: &str, inbox_id: &str) -> Self {
        let mut inboxes = HashMap::new();
        inboxes.insert(address.to_string(), inbox_id.to_string());
        Self { inboxes }
    }
}

#[async_trait]
impl InboxDirectory for StubInbox {
    async fn inbox_id_for_address(
        &self,
        address: &str,
    ) -> courier_lookup::Result<Option<String>> {
        Ok(self.inboxes.get(address).cloned())
    }
}

pub fn sample_user(username: &str, fid: u64) -> FarcasterUser {
    FarcasterUser {
        fid,
        username: username.to_string(),
        display_name: Some(format!("{} display", username)),
        pfp_url: None,
        verified_addresses: None,
    }
}

pub async fn test_state(ens: StubEns, farcaster: StubFarcaster, inbox: StubInbox) -> DaemonState {
    let core_cfg = CoreConfig {
        storage_path: format!("/tmp/courier-daemon-test-{}", Uuid::new_v4()),
        namespace: "test".to_string(),
        polling_interval_ms: 0,
    };
    let ens: Arc<dyn EnsResolver> = Arc::new(ens);
    let farcaster: Arc<dyn FarcasterResolver> = Arc::new(farcaster);
    let core = Core::init(
        core_cfg,
        ens.clone(),
        farcaster.clone(),
        AgentDirectory::default(),
        Arc::new(MockMessaging::new()),
    )
    .await
    .map(Arc::new)
    .expect("core");
    DaemonState {
        core,
        ens,
        farcaster,
        inbox: Arc::new(inbox),
    }
}

pub fn get(uri: &str) -> Request<()> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(())
        .expect("request")
}

pub async fn body_json(resp: Response<Full<Bytes>>) -> Value {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    serde_json::from_slice(&bytes).expect("json body")
}
