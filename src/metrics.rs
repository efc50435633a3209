//! Prometheus Exposition
//!
//! Renders the observations of one scrape in the Prometheus text format.
//!
//! Each scrape builds a fresh [`Registry`], so nothing survives between scrapes:
//! a torrent that disappeared upstream disappears from the output too.
//!
//! # Metric Families
//!
//! Observations sharing a name form one family. Families without labels become a
//! [`Gauge`], the rest a [`GaugeVec`]. All metrics use the `deluge_` namespace prefix.
//!
//! A family that cannot be registered (for instance a global stat whose key is not a
//! valid metric name) is logged and left out; the rest of the scrape still renders.

use crate::mapper::Observation;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use tracing::warn;

pub const NAMESPACE: &str = "deluge";

/// Observations grouped under one metric name
struct Family<'a> {
    name: &'a str,
    help: &'a str,
    label_names: &'static [&'static str],
    samples: Vec<&'a Observation>,
}

/// Render observations in Prometheus text format
pub fn render(observations: &[Observation]) -> anyhow::Result<String> {
    let registry = Registry::new();

    for family in group(observations) {
        if let Err(e) = register_family(&registry, &family) {
            warn!("Skipping metric {}_{}: {}", NAMESPACE, family.name, e);
        }
    }

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn group(observations: &[Observation]) -> Vec<Family<'_>> {
    let mut families: Vec<Family<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for observation in observations {
        let slot = *index.entry(observation.name.as_str()).or_insert_with(|| {
            families.push(Family {
                name: &observation.name,
                help: &observation.help,
                label_names: observation.labels.names(),
                samples: Vec::new(),
            });
            families.len() - 1
        });
        families[slot].samples.push(observation);
    }

    families
}

fn register_family(registry: &Registry, family: &Family<'_>) -> prometheus::Result<()> {
    let opts = Opts::new(family.name, family.help).namespace(NAMESPACE);

    if family.label_names.is_empty() {
        let gauge = Gauge::with_opts(opts)?;
        for sample in family.samples.iter().filter(|s| s.labels.names().is_empty()) {
            gauge.set(sample.value);
        }
        return registry.register(Box::new(gauge));
    }

    let gauge_vec = GaugeVec::new(opts, family.label_names)?;
    for sample in &family.samples {
        let values = sample.labels.values();
        match gauge_vec.get_metric_with_label_values(values.as_slice()) {
            Ok(gauge) => gauge.set(sample.value),
            Err(e) => warn!(
                "Dropping {}_{} sample {:?}: {}",
                NAMESPACE, family.name, values, e
            ),
        }
    }
    registry.register(Box::new(gauge_vec))
}
