//! Deluge Session Management
//!
//! The Web UI has two independent gates in front of the torrent data:
//!
//! 1. the HTTP session must be logged in (`auth.login`), and
//! 2. the Web UI must be connected to a daemon (`web.connect`).
//!
//! Neither is tracked locally. Every [`SessionManager::get_status`] call queries the
//! upstream, classifies the answer into a [`SessionPhase`] and repairs whichever gate
//! is closed, at most once per gate, before giving up for that scrape.

use crate::deluge::transport::RpcTransport;
use crate::deluge::types::{is_truthy, HostEntry, Snapshot, UiStatus, TORRENT_FIELDS};
use crate::error::{ExporterError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Connection phase inferred from a `web.update_ui` answer
#[derive(Debug)]
pub enum SessionPhase {
    /// `web.update_ui` returned no result: the HTTP session is not logged in
    Unauthenticated,
    /// Logged in, but the Web UI has no daemon connection
    AuthenticatedDisconnected,
    /// Logged in and connected; carries the usable status
    AuthenticatedConnected(Snapshot),
}

impl SessionPhase {
    /// Classify the raw `web.update_ui` result.
    pub fn classify(result: Value) -> Result<Self> {
        if result.is_null() {
            return Ok(Self::Unauthenticated);
        }
        let status: UiStatus = serde_json::from_value(result)?;
        Ok(match Snapshot::from_status(status) {
            Some(snapshot) => Self::AuthenticatedConnected(snapshot),
            None => Self::AuthenticatedDisconnected,
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::AuthenticatedDisconnected => "authenticated, disconnected",
            Self::AuthenticatedConnected(_) => "authenticated, connected",
        }
    }
}

/// Owns the upstream session and heals it on demand
///
/// # Thread Safety
///
/// The upstream session is stateful (cookie, daemon connection), so
/// `get_status` holds an internal lock for its whole duration: at most one call
/// is in flight per manager.
pub struct SessionManager {
    transport: Arc<dyn RpcTransport>,
    password: SecretString,
    in_flight: Mutex<()>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn RpcTransport>, password: SecretString) -> Self {
        Self {
            transport,
            password,
            in_flight: Mutex::new(()),
        }
    }

    /// Fetch the full status, logging in and connecting to a daemon as needed.
    ///
    /// # Errors
    ///
    /// - [`ExporterError::Auth`] - login rejected or the login call failed
    /// - [`ExporterError::ConnectionSetup`] - no daemon hosts, or connect rejected
    /// - [`ExporterError::Session`] - still not usable after recovery
    /// - transport errors from the `web.update_ui` call itself
    pub async fn get_status(&self) -> Result<Snapshot> {
        let _guard = self.in_flight.lock().await;

        let mut phase = self.fetch_phase().await?;

        if let SessionPhase::Unauthenticated = phase {
            self.login().await?;
            phase = self.fetch_phase().await?;
        }

        if let SessionPhase::AuthenticatedDisconnected = phase {
            self.connect().await?;
            phase = self.fetch_phase().await?;
        }

        match phase {
            SessionPhase::AuthenticatedConnected(snapshot) => Ok(snapshot),
            other => Err(ExporterError::Session(format!(
                "Deluge status unusable after recovery (session {})",
                other.name()
            ))),
        }
    }

    /// Query `web.update_ui` and classify the result.
    async fn fetch_phase(&self) -> Result<SessionPhase> {
        // An empty filter dict keeps the torrent list unfiltered; the state/label
        // aggregates come back in `filters` regardless.
        let params = json!([TORRENT_FIELDS, {}]);
        let result = self.transport.call("web.update_ui", params).await?;
        let phase = SessionPhase::classify(result)?;
        debug!("Deluge session is {}", phase.name());
        Ok(phase)
    }

    async fn login(&self) -> Result<()> {
        info!("Logging in to Deluge Web UI...");
        let params = json!([self.password.expose_secret()]);
        let result = self
            .transport
            .call("auth.login", params)
            .await
            .map_err(|e| {
                // The password was never checked; keep the upstream status visible
                ExporterError::Auth(format!(
                    "Web UI did not complete auth.login, credentials unchecked: {}",
                    e
                ))
            })?;

        if !is_truthy(&result) {
            return Err(ExporterError::Auth(
                "bad credentials: Web UI rejected the password".to_string(),
            ));
        }
        info!("Login successful");
        Ok(())
    }

    async fn connect(&self) -> Result<()> {
        info!("Connecting Deluge Web UI to a daemon...");
        let hosts = self.transport.call("web.get_hosts", json!([])).await?;

        let host = hosts
            .as_array()
            .and_then(|hosts| hosts.first())
            .and_then(HostEntry::from_value)
            .ok_or_else(|| {
                ExporterError::ConnectionSetup(format!("no usable daemon host in {}", hosts))
            })?;

        debug!(
            "Connecting to daemon {} ({}:{})",
            host.id,
            host.host.as_deref().unwrap_or("?"),
            host.port.unwrap_or_default()
        );
        let result = self
            .transport
            .call("web.connect", json!([host.id]))
            .await?;

        if !is_truthy(&result) {
            return Err(ExporterError::ConnectionSetup(format!(
                "web.connect to host {} rejected: {}",
                host.id, result
            )));
        }
        info!("Connected to daemon {}", host.id);
        Ok(())
    }
}
