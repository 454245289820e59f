//! Closed set of supported intents and their dispatch.
//!
//! Requests arrive as Dialogflow-style webhook bodies; the NLU layer has
//! already matched the intent and extracted its parameters.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::app::stats_use_case::StatsUseCase;
use crate::constants::{
    FALLBACK_INTENT, FALLBACK_MESSAGES, LOCATION_STATS_INTENT, WELCOME_INTENT, WELCOME_MESSAGE,
    WORLDWIDE_STATS_INTENT,
};
use crate::error::{Result, StatsError};
use crate::stats::time_range::parse_date_time;
use crate::types::{CaseTypeSelection, Country, DateTimeParam, QueryFilters};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: Option<String>,
    pub query_result: QueryResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    pub intent: IntentRef,
    #[serde(default)]
    pub parameters: IntentParameters,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    pub display_name: String,
}

/// A parameter the NLU layer sends either as a single value or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
        }
    }
}

/// Country parameter; an empty string means "not given"
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountryParam {
    Many(Vec<Country>),
    One(Country),
    Empty(String),
}

impl Default for CountryParam {
    fn default() -> Self {
        CountryParam::Many(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDateTime {
    /// Date periods use startDate/endDate, time periods startDateTime/endDateTime
    Range {
        #[serde(rename = "startDate", alias = "startDateTime")]
        start_date: String,
        #[serde(rename = "endDate", alias = "endDateTime")]
        end_date: String,
    },
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentParameters {
    #[serde(rename = "type", default)]
    pub case_types: OneOrMany<String>,
    #[serde(default)]
    pub county: OneOrMany<String>,
    #[serde(default)]
    pub province: OneOrMany<String>,
    #[serde(default)]
    pub country: CountryParam,
    #[serde(rename = "dateTime", default)]
    pub date_time: Option<RawDateTime>,
}

fn non_empty(values: OneOrMany<String>) -> Vec<String> {
    values
        .into_vec()
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

impl IntentParameters {
    pub fn case_type_selection(&self) -> CaseTypeSelection {
        CaseTypeSelection::from_raw(&non_empty(self.case_types.clone()))
    }

    pub fn to_filters(&self) -> Result<QueryFilters> {
        let countries = match self.country.clone() {
            CountryParam::Many(countries) => countries,
            CountryParam::One(country) => vec![country],
            CountryParam::Empty(_) => Vec::new(),
        };

        let date_time = match &self.date_time {
            None => None,
            Some(RawDateTime::Text(text)) if text.trim().is_empty() => None,
            Some(RawDateTime::Text(text)) => Some(DateTimeParam::Instant(parse_date_time(text)?)),
            Some(RawDateTime::Range { start_date, end_date }) => Some(DateTimeParam::Between {
                start: parse_date_time(start_date)?,
                end: parse_date_time(end_date)?,
            }),
        };

        Ok(QueryFilters {
            case_types: self.case_type_selection(),
            counties: non_empty(self.county.clone()),
            provinces: non_empty(self.province.clone()),
            countries,
            date_time,
        })
    }
}

/// Supported intents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Welcome,
    Fallback,
    WorldwideStats(CaseTypeSelection),
    LocationStats(QueryFilters),
}

impl Intent {
    /// Map a webhook request to an intent by its display name
    pub fn from_request(request: &WebhookRequest) -> Result<Self> {
        let name = request.query_result.intent.display_name.as_str();
        let parameters = &request.query_result.parameters;
        debug!(intent = name, "Decoding intent");

        match name {
            WELCOME_INTENT => Ok(Intent::Welcome),
            FALLBACK_INTENT => Ok(Intent::Fallback),
            WORLDWIDE_STATS_INTENT => Ok(Intent::WorldwideStats(parameters.case_type_selection())),
            LOCATION_STATS_INTENT => Ok(Intent::LocationStats(parameters.to_filters()?)),
            other => Err(StatsError::UnknownIntent(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::Welcome => WELCOME_INTENT,
            Intent::Fallback => FALLBACK_INTENT,
            Intent::WorldwideStats(_) => WORLDWIDE_STATS_INTENT,
            Intent::LocationStats(_) => LOCATION_STATS_INTENT,
        }
    }
}

/// Run the handler for an intent
pub async fn dispatch(intent: &Intent, use_case: &StatsUseCase, now: DateTime<Utc>) -> Result<()> {
    info!(intent = intent.name(), "Dispatching intent");
    match intent {
        Intent::Welcome => {
            use_case.output().add(WELCOME_MESSAGE);
            Ok(())
        }
        Intent::Fallback => {
            for message in FALLBACK_MESSAGES {
                use_case.output().add(message);
            }
            Ok(())
        }
        Intent::WorldwideStats(case_types) => use_case.worldwide_stats(case_types).await,
        Intent::LocationStats(filters) => use_case.location_stats(filters, now).await,
    }
}
