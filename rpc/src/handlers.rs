//! HTTP request handlers.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use eden_types::{AccountName, Member};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::RpcError;
use crate::server::AppState;

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub app_name: String,
    pub app_version: String,
    pub env: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    state.metrics.http_requests.inc();
    Json(HealthResponse {
        app_name: state.config.app_name.clone(),
        app_version: state.config.app_version.clone(),
        env: state.config.env.clone(),
    })
}

// ── Leadership ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HeadDelegateResponse {
    pub head_delegate: Option<AccountName>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChiefDelegatesResponse {
    pub chief_delegates: Option<Vec<AccountName>>,
}

pub async fn head_delegate(State(state): State<Arc<AppState>>) -> Json<HeadDelegateResponse> {
    state.metrics.http_requests.inc();
    Json(HeadDelegateResponse {
        head_delegate: state.resolver.head_delegate().await,
    })
}

pub async fn chief_delegates(State(state): State<Arc<AppState>>) -> Json<ChiefDelegatesResponse> {
    state.metrics.http_requests.inc();
    Json(ChiefDelegatesResponse {
        chief_delegates: state.resolver.chief_delegates().await,
    })
}

// ── Delegation ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct DelegationChainResponse {
    pub account: AccountName,
    pub delegates: Vec<Member>,
}

pub async fn delegation_chain(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<Json<DelegationChainResponse>, RpcError> {
    state.metrics.http_requests.inc();
    let account = AccountName::parse(&account)?;

    match state.resolver.resolve_chain(Some(account.as_str())).await {
        Ok(delegates) => {
            state.metrics.chain_resolutions.inc();
            state.metrics.chain_length.observe(delegates.len() as f64);
            Ok(Json(DelegationChainResponse { account, delegates }))
        }
        Err(e) => {
            state.metrics.malformed_chains.inc();
            Err(e.into())
        }
    }
}

// ── Members ──────────────────────────────────────────────────────────────

pub async fn member(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<Json<Member>, RpcError> {
    state.metrics.http_requests.inc();
    let account = AccountName::parse(&account)?;
    state
        .resolver
        .member(&account)
        .await
        .map(Json)
        .ok_or_else(|| RpcError::NotFound(format!("member {account}")))
}

// ── Telemetry ────────────────────────────────────────────────────────────

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, RpcError> {
    state.metrics.http_requests.inc();
    if let Some(stats) = state.cache_stats() {
        state.metrics.observe_cache(stats);
    }
    let body = state.metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
