//! HTTP server assembly for BCharity.
//!
//! Combines the JSON API from [`bcharity_api`] with a diagnostics route and
//! request tracing. The binary in `main.rs` supplies configuration and the
//! store.

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, extract::State, routing::get};
use bcharity_core::store::PublicationStore;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BCHARITY_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                      String,
  #[serde(default = "default_port")]
  pub port:                      u16,
  #[serde(default = "default_store_path")]
  pub store_path:                PathBuf,
  /// Selects mainnet endpoints and contract addresses. Testnet otherwise.
  #[serde(default)]
  pub is_mainnet:                bool,
  /// Reported by `/health`.
  #[serde(default)]
  pub git_commit_sha:            Option<String>,
  /// Key for the chain RPC provider used by wallet clients.
  #[serde(default)]
  pub rpc_api_key:               Option<String>,
  #[serde(default)]
  pub wallet_connect_project_id: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 4783 }

fn default_store_path() -> PathBuf { PathBuf::from("bcharity.sqlite3") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                      default_host(),
      port:                      default_port(),
      store_path:                default_store_path(),
      is_mainnet:                false,
      git_commit_sha:            None,
      rpc_api_key:               None,
      wallet_connect_project_id: None,
    }
  }
}

impl ServerConfig {
  pub fn network(&self) -> &'static str {
    if self.is_mainnet { "mainnet" } else { "testnet" }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Diagnostics ──────────────────────────────────────────────────────────────

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
  pub status:  &'static str,
  pub network: &'static str,
  pub commit:  String,
  pub version: &'static str,
}

impl Health {
  pub fn from_config(config: &ServerConfig) -> Self {
    Self {
      status:  "ok",
      network: config.network(),
      commit:  config
        .git_commit_sha
        .clone()
        .filter(|sha| !sha.is_empty())
        .unwrap_or_else(|| "unknown".to_owned()),
      version: env!("CARGO_PKG_VERSION"),
    }
  }
}

async fn health(State(health): State<Arc<Health>>) -> Json<Health> { Json(health.as_ref().clone()) }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/health` plus the API under `/api`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PublicationStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .with_state(Arc::new(Health::from_config(config)))
    .nest("/api", bcharity_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use bcharity_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  use super::*;

  async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn health_reports_network_and_commit() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let config = ServerConfig {
      is_mainnet: true,
      git_commit_sha: Some("abc123".into()),
      ..ServerConfig::default()
    };

    let (status, body) = get_json(router(store, &config), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["network"], "mainnet");
    assert_eq!(body["commit"], "abc123");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
  }

  #[tokio::test]
  async fn health_defaults_to_testnet_and_unknown_commit() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let (_, body) = get_json(router(store, &ServerConfig::default()), "/health").await;
    assert_eq!(body["network"], "testnet");
    assert_eq!(body["commit"], "unknown");
  }

  #[tokio::test]
  async fn api_is_nested() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let (status, body) = get_json(router(store, &ServerConfig::default()), "/api/causes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
  }

  #[test]
  fn config_defaults_apply_to_empty_source() {
    let config: ServerConfig = config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(config.address(), "127.0.0.1:4783");
    assert_eq!(config.store_path, PathBuf::from("bcharity.sqlite3"));
    assert!(!config.is_mainnet);
  }
}
