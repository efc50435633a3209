//! Snapshot to Observation Mapping
//!
//! Turns one [`Snapshot`] into the flat list of [`Observation`]s emitted for a scrape.
//!
//! # Observations Produced
//! - `torrent_state_count` - Number of torrents by state
//!   - Labels: state
//! - `torrent_label_count` - Number of torrents by label
//!   - Labels: label
//! - `<stat>` - One unlabeled gauge per numeric global stat (e.g. `upload_rate`)
//! - Per torrent, labeled name/state/tracker_host:
//!   `total_uploaded_bytes`, `total_wanted_bytes`, `total_done_bytes`,
//!   `download_payload_byte_rate`, `upload_payload_byte_rate`, `peers_total`,
//!   `seeds_total`, `peers_connected_total`, `seeds_connected_total`
//!
//! Mapping is total: malformed filter entries, non-numeric stats and incomplete
//! torrents are skipped individually and never abort the scrape.

use crate::deluge::types::{FilterEntry, Snapshot, TorrentRecord};
use serde_json::Value;
use tracing::debug;

/// Label set attached to an observation
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    None,
    State(String),
    Label(String),
    Torrent {
        name: String,
        state: String,
        tracker_host: String,
    },
}

impl Labels {
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::State(_) => &["state"],
            Self::Label(_) => &["label"],
            Self::Torrent { .. } => &["name", "state", "tracker_host"],
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::None => Vec::new(),
            Self::State(state) => vec![state.as_str()],
            Self::Label(label) => vec![label.as_str()],
            Self::Torrent {
                name,
                state,
                tracker_host,
            } => vec![name.as_str(), state.as_str(), tracker_host.as_str()],
        }
    }
}

/// One metric data point, named without the `deluge_` namespace
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: String,
    pub help: String,
    pub labels: Labels,
    pub value: f64,
}

/// Per-torrent counters keyed by metric name
fn torrent_counters(t: &TorrentRecord) -> [(&'static str, f64); 9] {
    [
        ("total_uploaded_bytes", t.total_uploaded),
        ("total_wanted_bytes", t.total_wanted),
        ("total_done_bytes", t.total_done),
        ("download_payload_byte_rate", t.download_payload_rate),
        ("upload_payload_byte_rate", t.upload_payload_rate),
        ("peers_total", t.total_peers),
        ("seeds_total", t.total_seeds),
        ("peers_connected_total", t.num_peers),
        ("seeds_connected_total", t.num_seeds),
    ]
}

/// Map a snapshot to its observations.
pub fn map(snapshot: &Snapshot) -> Vec<Observation> {
    let mut observations = Vec::new();

    map_filter(snapshot, "state", &mut observations);
    map_filter(snapshot, "label", &mut observations);

    for (key, value) in &snapshot.global_stats {
        if let Some(value) = stat_value(value) {
            observations.push(Observation {
                name: key.to_lowercase(),
                help: format!("Deluge metric {}", key),
                labels: Labels::None,
                value,
            });
        }
    }

    for (id, raw) in &snapshot.torrents {
        let Some(torrent) = TorrentRecord::from_value(raw) else {
            debug!("Skipping torrent {}: incomplete record", id);
            continue;
        };
        for (name, value) in torrent_counters(&torrent) {
            observations.push(Observation {
                name: name.to_string(),
                help: format!("Deluge metric {} by torrent", name),
                labels: Labels::Torrent {
                    name: torrent.name.clone(),
                    state: torrent.state.clone(),
                    tracker_host: torrent.tracker_host.clone(),
                },
                value,
            });
        }
    }

    observations
}

fn map_filter(snapshot: &Snapshot, category: &str, observations: &mut Vec<Observation>) {
    let Some(entries) = snapshot.filters.get(category) else {
        return;
    };

    for entry in entries.iter().filter_map(FilterEntry::from_value) {
        let value = entry.value.to_lowercase();
        let labels = match category {
            "state" => Labels::State(value),
            _ => Labels::Label(value),
        };
        observations.push(Observation {
            name: format!("torrent_{}_count", category),
            help: format!("Number of torrents by {}", category),
            labels,
            value: entry.count,
        });
    }
}

/// Numeric value of a global stat. Booleans count as 1/0; everything else is skipped.
fn stat_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
