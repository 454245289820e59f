//! Query Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};
use crate::stats::GroupingMode;

/// Metrics collection for query resolution and rendering
pub struct QueryMetrics;

impl QueryMetrics {
    /// Count a resolved location query by grouping mode
    pub fn record_resolved(mode: GroupingMode) {
        ::metrics::counter!(phase_metric!(counter, "query", "resolved"), "mode" => mode.as_str()).increment(1);
    }

    /// Count a worldwide summary request
    pub fn record_worldwide() {
        ::metrics::counter!(phase_metric!(counter, "query", "worldwide")).increment(1);
    }

    /// Number of location clauses in a rendered response
    pub fn record_locations_rendered(count: usize) {
        ::metrics::histogram!(phase_metric!(histogram, "query", "locations_rendered")).record(count as f64);
    }
}

impl PhaseMetrics for QueryMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        for mode in [GroupingMode::ByCounty, GroupingMode::ByProvince, GroupingMode::ByCountry] {
            let _ = counter!(phase_metric!(counter, "query", "resolved"), "mode" => mode.as_str());
        }
        let _ = counter!(phase_metric!(counter, "query", "worldwide"));
        let _ = histogram!(phase_metric!(histogram, "query", "locations_rendered"));
    }

    fn phase_name() -> &'static str {
        "query"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "query", "resolved"),
                metric_type: MetricType::Counter,
                help: "Location queries resolved, by grouping mode",
                labels: vec!["mode"],
            },
            MetricDoc {
                name: phase_metric!(counter, "query", "worldwide"),
                metric_type: MetricType::Counter,
                help: "Worldwide summary requests",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "query", "locations_rendered"),
                metric_type: MetricType::Histogram,
                help: "Number of locations rendered per response",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_metrics_registration() {
        // Without an installed recorder this is a no-op; it must not panic
        QueryMetrics::register_metrics();
        QueryMetrics::record_resolved(GroupingMode::ByProvince);
        QueryMetrics::record_locations_rendered(2);
    }

    #[test]
    fn test_query_metrics_documentation() {
        let docs = QueryMetrics::metrics_documentation();
        assert_eq!(docs.len(), 3);
        assert!(docs.iter().all(|d| d.name.starts_with("case_stats_query_")));
    }
}
