mod config;
mod routes;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use config::CourierConfig;
use courier_core::agents::AgentDirectory;
use courier_core::config::CoreConfig;
use courier_core::messaging::MockMessaging;
use courier_core::resolve::{EnsResolver, FarcasterResolver, NullEnsResolver, NullFarcasterResolver};
use courier_core::Core;
use courier_lookup::{EnsClient, InboxClient, InboxDirectory, LookupConfig, NeynarClient};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use log::LevelFilter;
use routes::{handle_request, DaemonState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(thiserror::Error, Debug)]
enum DaemonError {
    #[error("config")]
    Config,
    #[error("core")]
    Core,
    #[error("listen")]
    Listen,
}

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    let args: Vec<String> = std::env::args().collect();
    let mut path = PathBuf::from("courier.toml");
    let mut i = 1;
    while i + 1 < args.len() {
        if args[i] == "--config" {
            path = PathBuf::from(&args[i + 1]);
        }
        i += 1;
    }
    let cfg = config::load_config(&path).map_err(|_| DaemonError::Config)?;
    init_logging(&cfg);
    let state = build_state(&cfg).await?;
    let addr: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|_| DaemonError::Listen)?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server = start_control_server(state.clone(), addr, shutdown_rx).await?;
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let _ = ctrl_c.as_mut().await;
    let _ = shutdown_tx.send(());
    let _ = server.await;
    state.core.shutdown().await;
    Ok(())
}

fn init_logging(cfg: &CourierConfig) {
    let level = match cfg.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

/// Every address is a miss until the identity service is configured.
struct DisabledInbox;

#[async_trait]
impl InboxDirectory for DisabledInbox {
    async fn inbox_id_for_address(
        &self,
        _address: &str,
    ) -> courier_lookup::Result<Option<String>> {
        Ok(None)
    }
}

fn build_ens(cfg: &CourierConfig) -> Arc<dyn EnsResolver> {
    match cfg.lookup.eth_rpc_url.as_deref() {
        Some(rpc_url) => match EnsClient::new(rpc_url) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                log::warn!("ens resolution disabled (bad eth_rpc_url): {}", err);
                Arc::new(NullEnsResolver)
            }
        },
        None => {
            log::warn!("ens resolution disabled (no eth_rpc_url configured)");
            Arc::new(NullEnsResolver)
        }
    }
}

fn build_farcaster(cfg: &CourierConfig) -> Arc<dyn FarcasterResolver> {
    match cfg.lookup.neynar_api_key.as_deref() {
        Some(api_key) => {
            match NeynarClient::new(&cfg.lookup.neynar_base_url, api_key, LookupConfig::default())
            {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    log::warn!("farcaster resolution disabled: {}", err);
                    Arc::new(NullFarcasterResolver)
                }
            }
        }
        None => {
            log::warn!("farcaster resolution disabled (no neynar_api_key configured)");
            Arc::new(NullFarcasterResolver)
        }
    }
}

fn build_inbox(cfg: &CourierConfig) -> Arc<dyn InboxDirectory> {
    if cfg.lookup.network_base_urls.is_empty() {
        log::warn!("identity lookups disabled (no network_base_urls configured)");
        return Arc::new(DisabledInbox);
    }
    match InboxClient::new(&cfg.lookup.network_base_urls, LookupConfig::default()) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            log::warn!("identity lookups disabled: {}", err);
            Arc::new(DisabledInbox)
        }
    }
}

async fn build_state(cfg: &CourierConfig) -> Result<DaemonState, DaemonError> {
    let ens = build_ens(cfg);
    let farcaster = build_farcaster(cfg);
    let inbox = build_inbox(cfg);
    let directory = AgentDirectory::new(cfg.agents.clone());
    let core_cfg = CoreConfig {
        storage_path: cfg
            .data_dir
            .join("core")
            .to_str()
            .unwrap_or(".courier")
            .to_string(),
        namespace: cfg.session.namespace.clone(),
        polling_interval_ms: cfg.session.polling_interval_ms,
    };
    // no real messaging SDK binding is wired in-tree; the in-memory client
    // keeps the control surface and the reconciliation flow runnable
    let messaging = Arc::new(MockMessaging::new());
    let core = Core::init(core_cfg, ens.clone(), farcaster.clone(), directory, messaging)
        .await
        .map(Arc::new)
        .map_err(|_| DaemonError::Core)?;
    Ok(DaemonState {
        core,
        ens,
        farcaster,
        inbox,
    })
}

async fn start_control_server(
    state: DaemonState,
    addr: SocketAddr,
    shutdown: oneshot::Receiver<()>,
) -> Result<JoinHandle<()>, DaemonError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|_| DaemonError::Listen)?;
    log::info!("control server listening on {}", addr);
    let handle = tokio::spawn(async move {
        let mut shutdown = shutdown;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    break;
                }
                res = listener.accept() => {
                    match res {
                        Ok((stream, _)) => {
                            let state_clone = state.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req: Request<Incoming>| {
                                    let state = state_clone.clone();
                                    async move { handle_request(state, req).await }
                                });
                                let _ = http1::Builder::new().serve_connection(io, service).await;
                            });
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });
    Ok(handle)
}
