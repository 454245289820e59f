//! Grouping of fetched location records into a display-ordered result set.

use crate::constants::US_COUNTRY_CODE;
use crate::stats::delta::delta;
use crate::stats::scope::{county_key, GroupingMode};
use crate::types::{CaseCounts, CaseType, DateRange, LocationRecord, QueryFilters, ResultSet};
use tracing::{debug, warn};

/// Counts contributed by one record: latest totals, or the delta over `range`
fn record_counts(record: &LocationRecord, case_types: &[CaseType], range: Option<&DateRange>) -> CaseCounts {
    let counts = match range {
        Some(range) => delta(&record.timelines, range),
        None => record.latest.clone(),
    };
    counts.restricted_to(case_types)
}

/// Group `records` by the requested geography.
///
/// `active_province` is the single province captured during scope resolution;
/// county grouping matches nothing without it.
pub fn aggregate(
    records: &[LocationRecord],
    filters: &QueryFilters,
    mode: GroupingMode,
    active_province: Option<&str>,
    range: Option<&DateRange>,
) -> ResultSet {
    let case_types = filters.case_types.case_types();
    let mut results = ResultSet::new();

    match mode {
        GroupingMode::ByCounty => {
            let Some(province) = active_province else {
                warn!("County query without a single province context; nothing to match");
                return results;
            };
            let province = province.to_lowercase();
            let keys: Vec<String> = filters.counties.iter().map(|c| county_key(c).to_lowercase()).collect();

            for record in records {
                let county = record.county.to_lowercase();
                if record.province.to_lowercase() != province || !keys.contains(&county) {
                    continue;
                }
                // Restore the user's wording ("Cook County") for display
                let display = filters
                    .counties
                    .iter()
                    .find(|c| county_key(c).to_lowercase() == county)
                    .cloned()
                    .unwrap_or_else(|| record.county.clone());
                results.insert(display, record_counts(record, &case_types, range));
            }
        }
        GroupingMode::ByProvince => {
            let provinces: Vec<String> = filters.provinces.iter().map(|p| p.to_lowercase()).collect();
            for record in records {
                if record.country_code == US_COUNTRY_CODE && provinces.contains(&record.province.to_lowercase()) {
                    results.merge_sum(record.province.clone(), record_counts(record, &case_types, range));
                }
            }
        }
        GroupingMode::ByCountry => {
            let codes: Vec<&str> = filters.countries.iter().map(|c| c.alpha2.as_str()).collect();
            for record in records {
                if codes.contains(&record.country_code.as_str()) {
                    results.merge_sum(record.country.clone(), record_counts(record, &case_types, range));
                }
            }
        }
    }

    debug!(mode = mode.as_str(), records = records.len(), locations = results.len(), "Aggregated records");
    results
}
