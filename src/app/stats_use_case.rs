use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::app::ports::{CaseDataPort, ResponseSink};
use crate::error::Result;
use crate::metrics::QueryMetrics;
use crate::stats::{aggregate, format_locations, format_worldwide, resolve, resolve_time_range};
use crate::types::{CaseTypeSelection, QueryFilters};

/// Use case answering case-statistics questions with one sentence each
pub struct StatsUseCase {
    data: Box<dyn CaseDataPort>,
    output: Box<dyn ResponseSink>,
}

impl StatsUseCase {
    pub fn new(data: Box<dyn CaseDataPort>, output: Box<dyn ResponseSink>) -> Self {
        Self { data, output }
    }

    pub fn output(&self) -> &dyn ResponseSink {
        self.output.as_ref()
    }

    /// Global totals for the requested case types
    #[instrument(skip(self))]
    pub async fn worldwide_stats(&self, case_types: &CaseTypeSelection) -> Result<()> {
        QueryMetrics::record_worldwide();
        let latest = self.data.fetch_latest().await?;
        let text = format_worldwide(&case_types.case_types(), &latest);
        self.output.add(&text);
        Ok(())
    }

    /// Per-location counts (or deltas when a date/time is given)
    #[instrument(skip(self, filters, now))]
    pub async fn location_stats(&self, filters: &QueryFilters, now: DateTime<Utc>) -> Result<()> {
        let resolved = resolve(filters);
        QueryMetrics::record_resolved(resolved.mode);
        info!(query = %resolved.spec, mode = resolved.mode.as_str(), "Resolved location query");

        let records = self.data.fetch_locations(&resolved.spec).await?;

        let (range, time_phrase) = match &filters.date_time {
            Some(param) => {
                let (range, phrase) = resolve_time_range(param, now);
                (Some(range), phrase)
            }
            None => (None, String::new()),
        };

        let results = aggregate(
            &records,
            filters,
            resolved.mode,
            resolved.active_province.as_deref(),
            range.as_ref(),
        );
        QueryMetrics::record_locations_rendered(results.len());

        let text = format_locations(&filters.case_types.case_types(), &results, &time_phrase);
        self.output.add(&text);
        Ok(())
    }
}
