use bytes::Bytes;
use courier_api::types::{
    EnsLookupResponse, ErrorBody, FarcasterLookupResponse, IdentitySource,
    InboxIdentityResponse, ResolveResponse, ResolvedIdentity,
};
use courier_api::validation::{normalize_ens_name, normalize_wallet_address};
use courier_core::error::CoreError;
use courier_core::resolve::{EnsResolver, FarcasterResolver};
use courier_core::Core;
use courier_lookup::InboxDirectory;
use http_body_util::Full;
use hyper::http::Uri;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct DaemonState {
    pub core: Arc<Core>,
    pub ens: Arc<dyn EnsResolver>,
    pub farcaster: Arc<dyn FarcasterResolver>,
    pub inbox: Arc<dyn InboxDirectory>,
}

pub async fn handle_request<B>(
    state: DaemonState,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let response = match (req.method().as_str(), req.uri().path()) {
        ("GET", "/health") => json_response(StatusCode::OK, &json!({"status": "ok"})),
        ("GET", "/api/ens") => ens_route(&state, req.uri()).await,
        ("GET", "/api/farcaster") => farcaster_route(&state, req.uri()).await,
        ("GET", "/api/xmtp/identity") => identity_route(&state, req.uri()).await,
        ("GET", "/api/resolve") => resolve_route(&state, req.uri()).await,
        _ => json_response(StatusCode::NOT_FOUND, &ErrorBody::new("not found")),
    };
    Ok(response)
}

async fn ens_route(state: &DaemonState, uri: &Uri) -> Response<Full<Bytes>> {
    let Some(name) = query_param(uri, "name") else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new("name parameter is required"),
        );
    };
    let display_name = match normalize_ens_name(&name) {
        Ok(normalized) => normalized,
        Err(_) => {
            return json_response(StatusCode::BAD_REQUEST, &ErrorBody::new("invalid name"));
        }
    };
    match state.ens.resolve_name(&display_name).await {
        Ok(Some(address)) => json_response(
            StatusCode::OK,
            &EnsLookupResponse {
                name: display_name,
                address,
            },
        ),
        Ok(None) => json_response(
            StatusCode::NOT_FOUND,
            &ErrorBody::new("ens name not found or invalid"),
        ),
        Err(err) => {
            log::warn!("ens route lookup failed for {}: {}", display_name, err);
            json_response(
                StatusCode::NOT_FOUND,
                &ErrorBody::new("ens name not found or invalid"),
            )
        }
    }
}

async fn farcaster_route(state: &DaemonState, uri: &Uri) -> Response<Full<Bytes>> {
    let Some(username) = query_param(uri, "username") else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new("username parameter is required"),
        );
    };
    match state.farcaster.user_by_username(&username).await {
        Ok(Some(user)) => json_response(StatusCode::OK, &FarcasterLookupResponse { user }),
        Ok(None) => json_response(StatusCode::NOT_FOUND, &ErrorBody::new("user not found")),
        Err(err) => {
            log::warn!("farcaster route lookup failed for {}: {}", username, err);
            json_response(StatusCode::NOT_FOUND, &ErrorBody::new("user not found"))
        }
    }
}

async fn identity_route(state: &DaemonState, uri: &Uri) -> Response<Full<Bytes>> {
    let Some(address) = query_param(uri, "address") else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new("address is required"),
        );
    };
    let address = match normalize_wallet_address(&address) {
        Ok(normalized) => normalized,
        Err(_) => {
            return json_response(StatusCode::BAD_REQUEST, &ErrorBody::new("invalid address"));
        }
    };
    match state.inbox.inbox_id_for_address(&address).await {
        Ok(Some(inbox_id)) => {
            json_response(StatusCode::OK, &InboxIdentityResponse { inbox_id })
        }
        Ok(None) => json_response(
            StatusCode::NOT_FOUND,
            &ErrorBody::with_details("failed to fetch identity", json!({"address": address})),
        ),
        Err(err) => json_response(
            StatusCode::NOT_FOUND,
            &ErrorBody::with_details(
                "failed to fetch identity",
                json!({"address": address, "reason": err.to_string()}),
            ),
        ),
    }
}

async fn resolve_route(state: &DaemonState, uri: &Uri) -> Response<Full<Bytes>> {
    let Some(token) = query_param(uri, "token") else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new("token parameter is required"),
        );
    };
    match state.core.resolve_input(&token).await {
        Ok(target) => {
            let identity = target.identity.unwrap_or_else(|| ResolvedIdentity {
                handle: target.address.as_str().to_string(),
                display_label: target.address.short(),
                wallet_address: Some(target.address.as_str().to_string()),
                avatar_url: None,
                source: IdentitySource::Manual,
                extra: None,
            });
            json_response(StatusCode::OK, &ResolveResponse { identity })
        }
        Err(CoreError::Validation(reason)) => {
            json_response(StatusCode::BAD_REQUEST, &ErrorBody::new(reason))
        }
        Err(err) => {
            let body = match err.user_message() {
                Some(guidance) => {
                    ErrorBody::with_details("could not resolve token", json!({"hint": guidance}))
                }
                None => ErrorBody::new("could not resolve token"),
            };
            json_response(StatusCode::NOT_FOUND, &body)
        }
    }
}

fn query_param(uri: &Uri, key: &str) -> Option<String> {
    let query = uri.query()?;
    for pair in query.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            return Some(match urlencoding::decode(v) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => v.to_string(),
            });
        }
    }
    None
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let payload = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::from(payload))
        .unwrap_or_else(|_| Response::new(Full::from(Bytes::new())))
}
