pub mod core_tests;
pub mod side_index_tests;

use crate::agents::AgentDirectory;
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::resolve::{EnsResolver, FarcasterResolver, ResolutionPipeline};
use async_trait::async_trait;
use courier_api::types::{
    AgentIdentity, FarcasterUser, PrimaryAddresses, VerifiedAddresses,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub fn temp_path(label: &str) -> String {
    format!("/tmp/{}-{}", label, Uuid::new_v4())
}

pub fn base_config(path: String) -> CoreConfig {
    CoreConfig {
        storage_path: path,
        namespace: "test".to_string(),
        polling_interval_ms: 0,
    }
}

#[derive(Clone, Default)]
pub struct MockEns {
    names: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<usize>>,
    fail: Arc<Mutex<bool>>,
}

impl MockEns {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, name: &str, address: &str) {
        self.names
            .lock()
            .await
            .insert(name.to_ascii_lowercase(), address.to_string());
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    pub async fn count(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl EnsResolver for MockEns {
    async fn resolve_name(&self, name: &str) -> Result<Option<String>, CoreError> {
        *self.calls.lock().await += 1;
        if *self.fail.lock().await {
            return Err(CoreError::Transport("ens".to_string()));
        }
        Ok(self.names.lock().await.get(&name.to_ascii_lowercase()).cloned())
    }
}

#[derive(Clone, Default)]
pub struct MockFarcaster {
    users: Arc<Mutex<HashMap<String, FarcasterUser>>>,
    calls: Arc<Mutex<usize>>,
    fail: Arc<Mutex<bool>>,
}

impl MockFarcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: FarcasterUser) {
        self.users
            .lock()
            .await
            .insert(user.username.to_ascii_lowercase(), user);
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    pub async fn count(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl FarcasterResolver for MockFarcaster {
    async fn user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<FarcasterUser>, CoreError> {
        *self.calls.lock().await += 1;
        if *self.fail.lock().await {
            return Err(CoreError::Transport("farcaster".to_string()));
        }
        Ok(self
            .users
            .lock()
            .await
            .get(&username.to_ascii_lowercase())
            .cloned())
    }
}

pub fn farcaster_user(
    username: &str,
    fid: u64,
    primary: Option<&str>,
    verified: &[&str],
) -> FarcasterUser {
    let verified_addresses = if primary.is_none() && verified.is_empty() {
        None
    } else {
        Some(VerifiedAddresses {
            eth_addresses: verified.iter().map(|a| a.to_string()).collect(),
            primary: primary.map(|address| PrimaryAddresses {
                eth_address: Some(address.to_string()),
            }),
        })
    };
    FarcasterUser {
        fid,
        username: username.to_string(),
        display_name: None,
        pfp_url: None,
        verified_addresses,
    }
}

pub fn agent(handle: &str, address: &str) -> AgentIdentity {
    AgentIdentity {
        id: handle.to_string(),
        handle: handle.to_string(),
        display_name: format!("{} (agent)", handle),
        wallet_address: address.to_string(),
        avatar_url: None,
        description: Some(format!("{} helper", handle)),
    }
}

pub fn pipeline(
    ens: &MockEns,
    farcaster: &MockFarcaster,
    directory: AgentDirectory,
) -> Arc<ResolutionPipeline> {
    Arc::new(ResolutionPipeline::new(
        Arc::new(ens.clone()),
        Arc::new(farcaster.clone()),
        directory,
    ))
}

pub const ADDR_A: &str = "0x00000000000000000000000000000000000000aa";
pub const ADDR_B: &str = "0x00000000000000000000000000000000000000bb";
pub const ADDR_C: &str = "0x00000000000000000000000000000000000000cc";
