//! Collector tests: one scrape end to end against a scripted transport

mod common;

use common::{connected, disconnected, hosts, Reply, ScriptedTransport};
use deluge_exporter::collector::{CollectionStatus, DelugeCollector};
use deluge_exporter::deluge::SessionManager;
use deluge_exporter::metrics::render;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;

fn collector(transport: &Arc<ScriptedTransport>) -> DelugeCollector {
    DelugeCollector::new(SessionManager::new(
        transport.clone(),
        SecretString::from("deluge"),
    ))
}

#[tokio::test]
async fn test_successful_scrape() {
    // Given: A connected Web UI
    let transport = Arc::new(ScriptedTransport::new(vec![Reply::Ok(connected())]));
    let collector = collector(&transport);

    // When: Collecting
    let collection = collector.collect().await;

    // Then: States, labels, numeric stats and two torrents are emitted
    assert_eq!(collection.status, CollectionStatus::Success);
    assert!(collector.is_healthy());
    // 3 states + 2 labels + 4 numeric stats + 2 torrents x 9 counters
    assert_eq!(collection.observations.len(), 3 + 2 + 4 + 18);

    let rendered = render(&collection.observations).expect("render");
    assert!(rendered.contains("deluge_torrent_state_count{state=\"downloading\"} 1"));
    assert!(rendered.contains("deluge_upload_rate 1024"));
    assert!(!rendered.contains("external_ip"));
    assert!(rendered.contains("# HELP deluge_download_payload_byte_rate Deluge metric download_payload_byte_rate by torrent"));
}

#[tokio::test]
async fn test_failed_scrape_emits_nothing() {
    // Given: The Web UI rejects the password
    let transport = Arc::new(ScriptedTransport::new(vec![
        Reply::Ok(Value::Null),
        Reply::Ok(json!(false)),
    ]));
    let collector = collector(&transport);

    // When: Collecting
    let collection = collector.collect().await;

    // Then: The error is swallowed and no observations are produced
    assert_eq!(collection.status, CollectionStatus::Failed);
    assert!(collection.observations.is_empty());
    assert!(!collector.is_healthy());
}

#[tokio::test]
async fn test_health_follows_latest_scrape() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Reply::Ok(connected()),
        Reply::Ok(disconnected()),
        Reply::Ok(json!([])),
        Reply::Ok(disconnected()),
        Reply::Ok(hosts()),
        Reply::Ok(json!(true)),
        Reply::Ok(connected()),
    ]));
    let collector = collector(&transport);

    collector.collect().await;
    assert!(collector.is_healthy());

    collector.collect().await;
    assert!(!collector.is_healthy());

    collector.collect().await;
    assert!(collector.is_healthy());
}

#[tokio::test]
async fn test_concurrent_scrapes_do_not_interleave() {
    // Given: Two overlapping scrapes sharing one session
    let transport = Arc::new(ScriptedTransport::new(vec![
        Reply::Ok(Value::Null),
        Reply::Ok(json!(true)),
        Reply::Ok(connected()),
        Reply::Ok(connected()),
    ]));
    let collector = Arc::new(collector(&transport));

    // When: Running them together
    let (a, b) = tokio::join!(collector.collect(), collector.collect());

    // Then: Both succeed and the login sequence was not split by the second scrape
    assert_eq!(a.status, CollectionStatus::Success);
    assert_eq!(b.status, CollectionStatus::Success);
    assert_eq!(
        transport.methods(),
        vec!["web.update_ui", "auth.login", "web.update_ui", "web.update_ui"]
    );
}
