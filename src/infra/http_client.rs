use crate::app::ports::CaseDataPort;
use crate::config::ApiConfig;
use crate::constants::{LATEST_PATH, LOCATIONS_PATH, SOURCE_JHU};
use crate::error::{Result, StatsError};
use crate::metrics::UpstreamMetrics;
use crate::stats::QuerySpec;
use crate::types::{CaseCounts, CaseType, LocationRecord, Timeline};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Wire shape of `/v2/locations`
#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    locations: Vec<LocationDto>,
}

#[derive(Debug, Deserialize)]
struct LocationDto {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    latest: HashMap<String, Option<i64>>,
    #[serde(default)]
    timelines: Option<HashMap<String, TimelineDto>>,
}

#[derive(Debug, Deserialize)]
struct TimelineDto {
    #[serde(default)]
    timeline: HashMap<String, Option<i64>>,
}

/// Wire shape of `/v2/latest`
#[derive(Debug, Deserialize)]
struct LatestResponse {
    latest: HashMap<String, Option<i64>>,
}

fn parse_counts(raw: HashMap<String, Option<i64>>) -> CaseCounts {
    raw.into_iter()
        .filter_map(|(key, value)| match key.parse::<CaseType>() {
            Ok(case_type) => Some((case_type, value.unwrap_or(0))),
            Err(_) => {
                debug!("Skipping unknown case type key '{}'", key);
                None
            }
        })
        .collect()
}

fn parse_timelines(raw: HashMap<String, TimelineDto>) -> Timeline {
    let mut timeline = Timeline::new();
    for (key, series) in raw {
        let Ok(case_type) = key.parse::<CaseType>() else {
            debug!("Skipping unknown timeline key '{}'", key);
            continue;
        };
        timeline.declare(case_type);
        for (date, cumulative) in series.timeline {
            let Some(cumulative) = cumulative else {
                warn!("Skipping null timeline point '{}' for {}", date, case_type);
                continue;
            };
            match DateTime::parse_from_rfc3339(&date) {
                Ok(at) => timeline.insert(case_type, at.with_timezone(&Utc), cumulative),
                Err(e) => warn!("Skipping timeline point '{}' for {}: {}", date, case_type, e),
            }
        }
    }
    timeline
}

impl From<LocationDto> for LocationRecord {
    fn from(dto: LocationDto) -> Self {
        LocationRecord {
            country: dto.country.unwrap_or_default(),
            country_code: dto.country_code.unwrap_or_default(),
            province: dto.province.unwrap_or_default(),
            county: dto.county.unwrap_or_default(),
            latest: parse_counts(dto.latest),
            timelines: dto.timelines.map(parse_timelines).unwrap_or_default(),
        }
    }
}

/// Decode a `/v2/locations` body into domain records
pub fn decode_locations(bytes: &[u8]) -> Result<Vec<LocationRecord>> {
    let response: LocationsResponse = serde_json::from_slice(bytes)?;
    Ok(response.locations.into_iter().map(LocationRecord::from).collect())
}

/// Decode a `/v2/latest` body into global totals
pub fn decode_latest(bytes: &[u8]) -> Result<CaseCounts> {
    let response: LatestResponse = serde_json::from_slice(bytes)?;
    Ok(parse_counts(response.latest))
}

/// Case-data adapter backed by reqwest
pub struct ReqwestCaseData {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestCaseData {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn locations_url(&self, spec: &QuerySpec) -> String {
        format!("{}{}?source={}", self.base_url, LOCATIONS_PATH, spec.to_query_string())
    }

    pub fn latest_url(&self) -> String {
        format!("{}{}?source={}", self.base_url, LATEST_PATH, SOURCE_JHU)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Upstream {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl CaseDataPort for ReqwestCaseData {
    #[instrument(skip(self, spec), fields(query = %spec))]
    async fn fetch_locations(&self, spec: &QuerySpec) -> Result<Vec<LocationRecord>> {
        let url = self.locations_url(spec);
        debug!("Fetching locations from {}", url);
        let started = Instant::now();

        let result = match self.get_bytes(&url).await {
            Ok(bytes) => decode_locations(&bytes),
            Err(e) => Err(e),
        };
        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(records) => {
                UpstreamMetrics::record_request_success(elapsed, records.len());
                info!("Fetched {} location records in {:.2}s", records.len(), elapsed);
            }
            Err(e) => {
                UpstreamMetrics::record_request_error(elapsed);
                warn!("Location fetch failed: {}", e);
            }
        }
        result
    }

    #[instrument(skip(self))]
    async fn fetch_latest(&self) -> Result<CaseCounts> {
        let url = self.latest_url();
        debug!("Fetching worldwide totals from {}", url);
        let started = Instant::now();

        let result = match self.get_bytes(&url).await {
            Ok(bytes) => decode_latest(&bytes),
            Err(e) => Err(e),
        };
        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(_) => UpstreamMetrics::record_request_success(elapsed, 1),
            Err(e) => {
                UpstreamMetrics::record_request_error(elapsed);
                warn!("Worldwide fetch failed: {}", e);
            }
        }
        result
    }
}
