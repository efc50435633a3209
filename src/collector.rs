//! Scrape Collector
//!
//! One scrape = one [`SessionManager::get_status`] call followed by
//! [`mapper::map`]. Values are never cached: every scrape queries Deluge again.
//!
//! # Error Handling
//!
//! A failed status query is logged and produces no observations at all; the scrape
//! itself still succeeds with an empty body. The outcome is recorded so `/health`
//! can report it.

use crate::deluge::SessionManager;
use crate::mapper::{self, Observation};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};

/// Status of the most recent collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Deluge answered with a connected status
    Success,
    /// Status query failed (already logged)
    Failed,
}

/// Result of one scrape
#[derive(Debug)]
pub struct Collection {
    pub status: CollectionStatus,
    pub observations: Vec<Observation>,
}

pub struct DelugeCollector {
    session: SessionManager,
    last_success: AtomicBool,
}

impl DelugeCollector {
    pub fn new(session: SessionManager) -> Self {
        Self {
            session,
            last_success: AtomicBool::new(false),
        }
    }

    /// Query Deluge and map the answer, swallowing (and logging) any error.
    pub async fn collect(&self) -> Collection {
        let collection = match self.session.get_status().await {
            Ok(snapshot) => {
                let observations = mapper::map(&snapshot);
                debug!("Collected {} observations", observations.len());
                Collection {
                    status: CollectionStatus::Success,
                    observations,
                }
            }
            Err(e) => {
                error!("Failed to collect Deluge metrics: {}", e);
                Collection {
                    status: CollectionStatus::Failed,
                    observations: Vec::new(),
                }
            }
        };

        self.last_success.store(
            collection.status == CollectionStatus::Success,
            Ordering::SeqCst,
        );
        collection
    }

    /// Whether the most recent scrape reached a connected Deluge
    pub fn is_healthy(&self) -> bool {
        self.last_success.load(Ordering::SeqCst)
    }
}
