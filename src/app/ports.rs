use async_trait::async_trait;

use crate::error::Result;
use crate::stats::QuerySpec;
use crate::types::{CaseCounts, LocationRecord};

/// Source of case data (one network round-trip per call)
#[async_trait]
pub trait CaseDataPort: Send + Sync {
    /// Location records matching a resolved query
    async fn fetch_locations(&self, spec: &QuerySpec) -> Result<Vec<LocationRecord>>;

    /// Global latest totals
    async fn fetch_latest(&self) -> Result<CaseCounts>;
}

/// Where rendered text responses go
pub trait ResponseSink: Send + Sync {
    fn add(&self, text: &str);
}
