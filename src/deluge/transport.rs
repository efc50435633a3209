//! Deluge JSON-RPC Transport
//!
//! Every call is an HTTP `POST` to `<base-url>/json` carrying
//! `{"method": ..., "params": [...], "id": n}`. The Web UI authenticates with a
//! session cookie set by `auth.login`, so the underlying `reqwest::Client` keeps a
//! cookie store and is reused for the lifetime of the process.
//!
//! The transport never retries. Recovery (login, daemon connect) belongs to the
//! [`SessionManager`](crate::deluge::SessionManager).

use crate::config::DelugeConfig;
use crate::deluge::types::{JsonRpcRequest, JsonRpcResponse};
use crate::error::{ExporterError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// A request/response RPC channel to the Deluge Web UI
///
/// Returns the envelope's `result` (`Value::Null` when absent); interpreting it is
/// up to the caller.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value>;
}

/// `reqwest`-backed transport with a persistent cookie session
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    request_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(config: &DelugeConfig) -> Result<Self> {
        let api_url = config.api_url()?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ExporterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = JsonRpcRequest {
            method,
            params,
            id: self.next_id(),
        };

        debug!("Sending request: {}", method);
        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExporterError::Transport(format!(
                "{} returned HTTP {}: {}",
                method, status, body
            )));
        }

        let envelope: JsonRpcResponse = response.json().await?;
        if let Some(error) = &envelope.error {
            debug!(
                "{} returned error (code {:?}): {}",
                method,
                error.code,
                error.message.as_deref().unwrap_or("unknown")
            );
        }

        Ok(envelope.result)
    }
}
