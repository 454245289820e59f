use anyhow::Result;
use async_trait::async_trait;
use case_stats::app::intent::{dispatch, Intent, WebhookRequest};
use case_stats::app::ports::CaseDataPort;
use case_stats::app::stats_use_case::StatsUseCase;
use case_stats::infra::http_client::decode_locations;
use case_stats::infra::sink::CollectingSink;
use case_stats::stats::{aggregate, delta, format_locations, resolve, GroupingMode, QuerySpec};
use case_stats::types::{CaseCounts, CaseType, CaseTypeSelection, DateRange, LocationRecord, QueryFilters, Timeline};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

/// Serves a fixed upstream body, as the real API would for any query
struct FixtureCaseData {
    body: serde_json::Value,
}

#[async_trait]
impl CaseDataPort for FixtureCaseData {
    async fn fetch_locations(&self, _spec: &QuerySpec) -> case_stats::error::Result<Vec<LocationRecord>> {
        decode_locations(self.body.to_string().as_bytes())
    }

    async fn fetch_latest(&self) -> case_stats::error::Result<CaseCounts> {
        Ok([(CaseType::Confirmed, 1000), (CaseType::Deaths, 50), (CaseType::Recovered, 200)]
            .into_iter()
            .collect())
    }
}

fn nyt_fixture() -> serde_json::Value {
    json!({
        "locations": [
            {
                "country": "US", "country_code": "US", "province": "Texas", "county": "Harris",
                "latest": { "confirmed": 10, "deaths": 1, "recovered": 0 },
                "timelines": {
                    "confirmed": { "timeline": {
                        "2020-04-01T00:00:00Z": 2, "2020-04-02T00:00:00Z": 6, "2020-04-03T00:00:00Z": 10
                    } }
                }
            },
            {
                "country": "US", "country_code": "US", "province": "Texas", "county": "Dallas",
                "latest": { "confirmed": 5, "deaths": 0, "recovered": 0 },
                "timelines": {
                    "confirmed": { "timeline": {
                        "2020-04-01T00:00:00Z": 1, "2020-04-03T00:00:00Z": 5
                    } }
                }
            },
            {
                "country": "US", "country_code": "US", "province": "Illinois", "county": "Cook",
                "latest": { "confirmed": 300, "deaths": 12, "recovered": 0 }
            }
        ]
    })
}

fn use_case(body: serde_json::Value) -> (StatsUseCase, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    let use_case = StatsUseCase::new(Box::new(FixtureCaseData { body }), Box::new(sink.clone()));
    (use_case, sink)
}

fn webhook(intent: &str, parameters: serde_json::Value) -> WebhookRequest {
    serde_json::from_value(json!({
        "queryResult": { "intent": { "displayName": intent }, "parameters": parameters }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_province_rows_merge_into_one_entry() -> Result<()> {
    let (use_case, sink) = use_case(nyt_fixture());
    let request = webhook("Location Stats Intent", json!({ "type": ["confirmed"], "province": ["Texas"] }));

    dispatch(&Intent::from_request(&request)?, &use_case, Utc::now()).await?;
    assert_eq!(sink.responses(), vec!["According to my latest data, there are 15 confirmed cases in Texas."]);
    Ok(())
}

#[tokio::test]
async fn test_province_delta_between_dates() -> Result<()> {
    let (use_case, sink) = use_case(nyt_fixture());
    let request = webhook(
        "Location Stats Intent",
        json!({
            "type": ["confirmed"],
            "province": ["Texas"],
            "dateTime": { "startDate": "2020-04-01T00:00:00Z", "endDate": "2020-04-03T00:00:00Z" }
        }),
    );

    dispatch(&Intent::from_request(&request)?, &use_case, Utc::now()).await?;
    assert_eq!(
        sink.responses(),
        vec!["According to my latest data, there are 12 confirmed cases in Texas between 4/1/2020, 12:00:00 AM and 4/3/2020, 12:00:00 AM."]
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_county_renders_empty_sentence() -> Result<()> {
    let (use_case, sink) = use_case(nyt_fixture());
    let request = webhook(
        "Location Stats Intent",
        json!({ "type": ["deaths"], "county": ["Travis County"], "province": ["Texas"] }),
    );

    dispatch(&Intent::from_request(&request)?, &use_case, Utc::now()).await?;
    assert_eq!(sink.responses(), vec!["According to my latest data, there are."]);
    Ok(())
}

#[tokio::test]
async fn test_worldwide_all() -> Result<()> {
    let (use_case, sink) = use_case(json!({ "locations": [] }));
    let request = webhook("Worldwide Stats Intent", json!({ "type": ["all"] }));

    dispatch(&Intent::from_request(&request)?, &use_case, Utc::now()).await?;
    assert_eq!(
        sink.responses(),
        vec!["According to my latest data, there are 1000 confirmed cases, 50 deaths, 200 recovered cases worldwide."]
    );
    Ok(())
}

#[tokio::test]
async fn test_welcome_and_fallback() -> Result<()> {
    let (use_case, sink) = use_case(json!({ "locations": [] }));
    dispatch(&Intent::Welcome, &use_case, Utc::now()).await?;
    dispatch(&Intent::Fallback, &use_case, Utc::now()).await?;
    assert_eq!(
        sink.responses(),
        vec!["Welcome to my agent!", "I didn't understand", "I'm sorry, can you try again?"]
    );
    Ok(())
}

#[test]
fn test_county_mode_wins_regardless_of_other_filters() {
    let filters = QueryFilters {
        counties: vec!["Cook County".to_string()],
        ..Default::default()
    };
    assert_eq!(resolve(&filters).mode, GroupingMode::ByCounty);
}

#[test]
fn test_delta_sign_and_sparse_ranges() {
    let mut timeline = Timeline::new();
    let day = |d: u32| Utc.with_ymd_and_hms(2020, 5, d, 0, 0, 0).unwrap();
    for (d, v) in [(1, 40), (2, 35), (3, 31), (10, 100)] {
        timeline.insert(CaseType::Deaths, day(d), v);
    }

    let three_days = DateRange::new(day(1).timestamp_millis(), day(3).timestamp_millis());
    assert_eq!(delta(&timeline, &three_days).get(CaseType::Deaths), -9);

    let single_point = DateRange::new(day(4).timestamp_millis(), day(10).timestamp_millis());
    assert_eq!(delta(&timeline, &single_point).get(CaseType::Deaths), 0);
}

#[test]
fn test_aggregate_then_format_is_repeatable() -> Result<()> {
    let records = decode_locations(nyt_fixture().to_string().as_bytes())?;
    let filters = QueryFilters {
        case_types: CaseTypeSelection::from_raw(&["confirmed", "deaths"]),
        counties: vec!["Cook County".to_string()],
        provinces: vec!["Illinois".to_string()],
        ..Default::default()
    };
    let resolved = resolve(&filters);
    assert_eq!(resolved.spec.to_query_string(), "nyt&county=Cook&province=Illinois&country_code=US");

    let render = || {
        let results = aggregate(&records, &filters, resolved.mode, resolved.active_province.as_deref(), None);
        format_locations(&filters.case_types.case_types(), &results, "")
    };
    let first = render();
    assert_eq!(first, "According to my latest data, there are 300 confirmed cases, 12 deaths in Cook County.");
    assert_eq!(first, render());
    Ok(())
}
