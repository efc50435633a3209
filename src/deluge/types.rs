//! Deluge Web API Type Definitions
//!
//! This module contains the JSON-RPC envelope used by the Deluge Web UI (`/json`)
//! and the payload types decoded from it.
//!
//! # Design Notes
//!
//! - **Tolerant decoding**: while the Web UI has no daemon, `web.update_ui` answers
//!   `"filters": null, "torrents": null`. Every section is decoded as an `Option`
//!   (null or missing both become `None`) and defaults to empty in [`Snapshot`].
//! - **Per-torrent validation**: torrent entries stay raw JSON until
//!   [`TorrentRecord::from_value`] validates them. An incomplete torrent yields `None`
//!   and is skipped by the mapper instead of failing the whole payload.
//!
//! # API Methods Covered
//!
//! - `auth.login` → `bool`
//! - `web.get_hosts` → [`HostEntry`] list
//! - `web.connect` → list of exported methods (truthy on success)
//! - `web.update_ui` → [`UiStatus`]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields requested from `web.update_ui` for every torrent
pub const TORRENT_FIELDS: [&str; 13] = [
    "label",
    "name",
    "state",
    "tracker_host",
    "total_uploaded",
    "total_wanted",
    "total_done",
    "download_payload_rate",
    "upload_payload_rate",
    "total_peers",
    "total_seeds",
    "num_peers",
    "num_seeds",
];

/// JSON-RPC request as understood by the Deluge Web UI
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub method: &'a str,
    pub params: Value,
    pub id: u64,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[allow(dead_code)] // Part of the envelope
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Payload of `web.update_ui`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UiStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub filters: Option<BTreeMap<String, Option<Vec<Value>>>>,
    #[serde(default)]
    pub stats: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub torrents: Option<BTreeMap<String, Value>>,
}

/// One `[value, count]` pair of a filter category
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub value: String,
    pub count: f64,
}

impl FilterEntry {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value.as_array()?.as_slice() {
            [Value::String(value), count] => Some(Self {
                value: value.clone(),
                count: count.as_f64()?,
            }),
            _ => None,
        }
    }
}

/// Scrape-scoped view of the upstream; only ever built from a connected status.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub filters: BTreeMap<String, Vec<Value>>,
    pub global_stats: BTreeMap<String, Value>,
    pub torrents: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Convert a connected status into a snapshot. Returns `None` when disconnected.
    pub fn from_status(status: UiStatus) -> Option<Self> {
        if !status.connected {
            return None;
        }
        let filters = status
            .filters
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(category, entries)| Some((category, entries?)))
            .collect();
        Some(Self {
            filters,
            global_stats: status.stats.unwrap_or_default(),
            torrents: status.torrents.unwrap_or_default(),
        })
    }
}

/// Validated torrent entry from the `torrents` map
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentRecord {
    pub name: String,
    /// Lower-cased torrent state
    pub state: String,
    pub tracker_host: String,
    pub total_uploaded: f64,
    pub total_wanted: f64,
    pub total_done: f64,
    pub download_payload_rate: f64,
    pub upload_payload_rate: f64,
    pub total_peers: f64,
    pub total_seeds: f64,
    pub num_peers: f64,
    pub num_seeds: f64,
}

impl TorrentRecord {
    /// Validate a raw torrent entry. Any missing or mistyped field yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = |key: &str| value.get(key)?.as_str().map(str::to_string);
        let number = |key: &str| value.get(key)?.as_f64();

        Some(Self {
            name: text("name")?,
            state: text("state")?.to_lowercase(),
            tracker_host: text("tracker_host")?,
            total_uploaded: number("total_uploaded")?,
            total_wanted: number("total_wanted")?,
            total_done: number("total_done")?,
            download_payload_rate: number("download_payload_rate")?,
            upload_payload_rate: number("upload_payload_rate")?,
            total_peers: number("total_peers")?,
            total_seeds: number("total_seeds")?,
            num_peers: number("num_peers")?,
            num_seeds: number("num_seeds")?,
        })
    }
}

/// Host entry from `web.get_hosts`: `[id, host, port, username]`
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub id: String,
    pub host: Option<String>,
    pub port: Option<u64>,
}

impl HostEntry {
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_array()?;
        let id = fields.first()?.as_str()?;
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            host: fields.get(1).and_then(Value::as_str).map(str::to_string),
            port: fields.get(2).and_then(Value::as_u64),
        })
    }
}

/// Whether a JSON-RPC result counts as success: null, `false`, zero and empty values do not
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
