//! Registration of all phase metrics with conflict detection

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Register every phase and warn on duplicate metric names
pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::upstream::UpstreamMetrics>(&mut all_metrics);
    register_phase_metrics::<super::query::QueryMetrics>(&mut all_metrics);

    info!("Registered {} total metrics across all phases", all_metrics.len());
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<String, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if phase_of(doc.name) != phase_name {
            warn!("Metric '{}' does not carry the '{}' phase prefix", doc.name, phase_name);
        }
        if all_metrics.contains_key(doc.name) {
            warn!("Metric name conflict detected: '{}' redefined by phase '{}'", doc.name, phase_name);
        } else {
            debug!("  - {} ({:?}): {}", doc.name, doc.metric_type, doc.help);
            all_metrics.insert(doc.name.to_string(), doc);
        }
    }
}

/// Extract phase name from metric name (e.g., "case_stats_upstream_requests_error_total" -> "upstream")
pub fn phase_of(metric_name: &str) -> &str {
    metric_name
        .strip_prefix("case_stats_")
        .and_then(|rest| rest.split('_').next())
        .unwrap_or("unknown")
}
