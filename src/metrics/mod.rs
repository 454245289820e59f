//! Metrics for the case statistics engine
//!
//! Each phase of a request (upstream fetch, query resolution) owns its metric
//! definitions in a dedicated submodule so names stay consistent.

pub mod query;
pub mod registry;
pub mod upstream;

pub use query::QueryMetrics;
pub use upstream::UpstreamMetrics;

use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Initialize the global metrics recorder
///
/// Idempotent. The Prometheus HTTP exporter is only started when `http_addr`
/// is given; otherwise the recorder is installed for in-process use only.
/// Must be called from within a tokio runtime when `http_addr` is set.
pub fn init_metrics(http_addr: Option<SocketAddr>) {
    INIT.call_once(|| {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();

        let installed = match http_addr {
            Some(addr) => {
                let result = builder.with_http_listener(addr).install();
                if result.is_ok() {
                    info!("Prometheus HTTP exporter started at http://{}/metrics", addr);
                }
                result
            }
            None => builder.install_recorder().map(|_handle| ()),
        };

        match installed {
            Ok(()) => {
                registry::register_all_metrics();
                info!("Case statistics metrics registered");
            }
            Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
        }
    });
}

/// Trait for phase-specific metrics collections
///
/// Each phase implements this trait to provide:
/// - Metric registration at startup
/// - Consistent naming conventions
/// - Documentation of what each metric measures
pub trait PhaseMetrics {
    /// Register all metrics for this phase
    fn register_metrics();

    /// Get the phase name for prefixing metrics
    fn phase_name() -> &'static str;

    /// Get documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    #[allow(dead_code)]
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Phase-scoped metric names: case_stats_{phase}_{name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("case_stats_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("case_stats_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
