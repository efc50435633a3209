//! Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use deluge_exporter::deluge::RpcTransport;
use deluge_exporter::error::{ExporterError, Result};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Canned reply for one upstream call
pub enum Reply {
    Ok(Value),
    Fail(&'static str),
}

/// In-memory transport that answers calls from a script and records them
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Methods called so far, in order
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    pub fn params(&self, index: usize) -> Value {
        self.calls.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        // Give other tasks a chance to run, as a real network round trip would
        tokio::task::yield_now().await;

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Fail(message)) => Err(ExporterError::Transport(message.to_string())),
            None => Err(ExporterError::Transport(format!(
                "unexpected call to {}",
                method
            ))),
        }
    }
}

pub fn disconnected() -> Value {
    // Shape Deluge answers with while the Web UI has no daemon
    json!({
        "connected": false,
        "torrents": null,
        "filters": null,
        "stats": {"max_download": -1.0, "max_upload": -1.0, "max_num_connections": -1}
    })
}

pub fn connected() -> Value {
    json!({
        "connected": true,
        "filters": {
            "state": [["All", 2], ["Downloading", 1], ["Seeding", 1]],
            "label": [["", 1], ["Movies", 1]]
        },
        "stats": {
            "upload_rate": 1024.0,
            "download_rate": 2048.0,
            "num_connections": 12,
            "external_ip": "10.0.0.1",
            "has_incoming_connections": true
        },
        "torrents": {
            "abc123": torrent("ubuntu.iso", "Downloading", "tracker.ubuntu.com"),
            "def456": torrent("debian.iso", "Seeding", "tracker.debian.org")
        }
    })
}

pub fn torrent(name: &str, state: &str, tracker_host: &str) -> Value {
    json!({
        "label": "",
        "name": name,
        "state": state,
        "tracker_host": tracker_host,
        "total_uploaded": 1000,
        "total_wanted": 5000,
        "total_done": 2500,
        "download_payload_rate": 300,
        "upload_payload_rate": 20,
        "total_peers": 40,
        "total_seeds": 80,
        "num_peers": 4,
        "num_seeds": 8
    })
}

pub fn hosts() -> Value {
    json!([["c8e4f2d1", "127.0.0.1", 58846, "localclient"]])
}
