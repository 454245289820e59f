//! Scope resolution: which upstream query to issue and how to group its rows.

use crate::constants::{SOURCE_JHU, SOURCE_NYT, US_COUNTRY_CODE};
use crate::types::QueryFilters;
use std::fmt;

/// Upstream data feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// US-specific feed with county and state rows
    Nyt,
    /// Global feed
    Jhu,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Nyt => SOURCE_NYT,
            DataSource::Jhu => SOURCE_JHU,
        }
    }
}

/// Server-side narrowing applied to the upstream request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    County { county: String, province: String },
    Province { province: String },
    Country { code: String },
    Unfiltered,
}

/// Geographic granularity result rows are merged by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    ByCounty,
    ByProvince,
    ByCountry,
}

impl GroupingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingMode::ByCounty => "by_county",
            GroupingMode::ByProvince => "by_province",
            GroupingMode::ByCountry => "by_country",
        }
    }
}

/// A fully resolved upstream query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub source: DataSource,
    pub timelines: bool,
    pub scope: QueryScope,
}

impl QuerySpec {
    /// The value of the `source` query parameter, with the remaining parameters appended positionally
    pub fn to_query_string(&self) -> String {
        let mut query = self.source.as_str().to_string();
        if self.timelines {
            query.push_str("&timelines=true");
        }
        match &self.scope {
            QueryScope::County { county, province } => {
                query.push_str(&format!(
                    "&county={}&province={}&country_code={}",
                    county, province, US_COUNTRY_CODE
                ));
            }
            QueryScope::Province { province } => {
                query.push_str(&format!("&province={}&country_code={}", province, US_COUNTRY_CODE));
            }
            QueryScope::Country { code } => {
                query.push_str(&format!("&country_code={}", code));
            }
            QueryScope::Unfiltered => {}
        }
        query
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Output of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    pub spec: QuerySpec,
    pub mode: GroupingMode,
    /// Province context for county-level grouping, set only when exactly one was given
    pub active_province: Option<String>,
}

/// First whitespace-delimited token of a county name ("Cook County" -> "Cook")
pub fn county_key(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

/// Decide the upstream query and grouping mode for a set of filters
pub fn resolve(filters: &QueryFilters) -> ResolvedScope {
    let timelines = filters.date_time.is_some();
    let mut active_province = None;

    let (source, scope) = if !filters.counties.is_empty() || !filters.provinces.is_empty() {
        let county = match filters.counties.as_slice() {
            [single] => Some(county_key(single).to_string()).filter(|c| !c.is_empty()),
            _ => None,
        };
        if let [single] = filters.provinces.as_slice() {
            active_province = Some(single.clone());
        }

        let scope = match (county, &active_province) {
            (Some(county), province) => QueryScope::County {
                county,
                province: province.clone().unwrap_or_default(),
            },
            (None, Some(province)) => QueryScope::Province { province: province.clone() },
            (None, None) => QueryScope::Country { code: US_COUNTRY_CODE.to_string() },
        };
        (DataSource::Nyt, scope)
    } else {
        let scope = match filters.countries.as_slice() {
            [single] if !single.alpha2.is_empty() => QueryScope::Country { code: single.alpha2.clone() },
            _ => QueryScope::Unfiltered,
        };
        (DataSource::Jhu, scope)
    };

    let mode = if !filters.counties.is_empty() {
        GroupingMode::ByCounty
    } else if !filters.provinces.is_empty() {
        GroupingMode::ByProvince
    } else {
        GroupingMode::ByCountry
    };

    ResolvedScope {
        spec: QuerySpec { source, timelines, scope },
        mode,
        active_province,
    }
}
