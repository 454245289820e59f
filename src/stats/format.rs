//! Rendering of result sets into the single response sentence.

use crate::constants::{RESPONSE_PREFIX, WORLDWIDE};
use crate::types::{CaseCounts, CaseType, ResultSet};

/// "100 confirmed cases, 5 deaths"
fn counts_clause(case_types: &[CaseType], counts: &CaseCounts) -> String {
    case_types
        .iter()
        .map(|case_type| {
            let count = counts.get(*case_type);
            if case_type.takes_cases_suffix() {
                format!("{} {} cases", count, case_type)
            } else {
                format!("{} {}", count, case_type)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn sentence(parts: &[&str]) -> String {
    let mut output = RESPONSE_PREFIX.to_string();
    for part in parts.iter().filter(|p| !p.is_empty()) {
        output.push(' ');
        output.push_str(part);
    }
    output.push('.');
    output
}

/// One clause per location in result order, then the optional time phrase
pub fn format_locations(case_types: &[CaseType], results: &ResultSet, time_phrase: &str) -> String {
    let body = results
        .iter()
        .map(|(location, counts)| {
            let clause = counts_clause(case_types, counts);
            if clause.is_empty() {
                format!("in {}", location)
            } else {
                format!("{} in {}", clause, location)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    sentence(&[body.as_str(), time_phrase])
}

/// World-level summary: no location names, just "worldwide"
pub fn format_worldwide(case_types: &[CaseType], counts: &CaseCounts) -> String {
    let clause = counts_clause(case_types, counts);
    sentence(&[clause.as_str(), WORLDWIDE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseTypeSelection;

    fn counts(values: &[(CaseType, i64)]) -> CaseCounts {
        values.iter().copied().collect()
    }

    #[test]
    fn test_single_location_two_types() {
        let mut results = ResultSet::new();
        results.insert("California", counts(&[(CaseType::Confirmed, 100), (CaseType::Deaths, 5)]));

        let output = format_locations(&[CaseType::Confirmed, CaseType::Deaths], &results, "");
        assert_eq!(
            output,
            "According to my latest data, there are 100 confirmed cases, 5 deaths in California."
        );
    }

    #[test]
    fn test_worldwide_all_expands_in_fixed_order() {
        let case_types = CaseTypeSelection::from_raw(&["all"]).case_types();
        let world = counts(&[(CaseType::Recovered, 200), (CaseType::Confirmed, 1000), (CaseType::Deaths, 50)]);

        assert_eq!(
            format_worldwide(&case_types, &world),
            "According to my latest data, there are 1000 confirmed cases, 50 deaths, 200 recovered cases worldwide."
        );
    }

    #[test]
    fn test_multiple_locations_with_time_phrase() {
        let mut results = ResultSet::new();
        results.insert("Italy", counts(&[(CaseType::Deaths, 7)]));
        results.insert("Spain", counts(&[(CaseType::Deaths, 1)]));

        let output = format_locations(&[CaseType::Deaths], &results, "since 4/1/2020, 12:00:00 AM");
        assert_eq!(
            output,
            "According to my latest data, there are 7 deaths in Italy, 1 deaths in Spain since 4/1/2020, 12:00:00 AM."
        );
    }

    #[test]
    fn test_request_order_is_preserved() {
        let mut results = ResultSet::new();
        results.insert("Ohio", counts(&[(CaseType::Confirmed, 1), (CaseType::Recovered, 1)]));

        let output = format_locations(&[CaseType::Recovered, CaseType::Confirmed], &results, "");
        assert_eq!(
            output,
            "According to my latest data, there are 1 recovered cases, 1 confirmed cases in Ohio."
        );
    }

    #[test]
    fn test_empty_result_set() {
        let output = format_locations(&[CaseType::Confirmed], &ResultSet::new(), "");
        assert_eq!(output, "According to my latest data, there are.");
    }

    #[test]
    fn test_missing_count_renders_zero() {
        let mut results = ResultSet::new();
        results.insert("Cook County", counts(&[(CaseType::Confirmed, 3)]));

        let output = format_locations(&[CaseType::Confirmed, CaseType::Recovered], &results, "");
        assert_eq!(
            output,
            "According to my latest data, there are 3 confirmed cases, 0 recovered cases in Cook County."
        );
    }
}
