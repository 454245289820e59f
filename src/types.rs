use crate::constants::{ALL_CASE_TYPES, CONFIRMED, DEATHS, RECOVERED};
use crate::error::StatsError;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// The closed set of case categories reported upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Confirmed,
    Deaths,
    Recovered,
}

impl CaseType {
    /// Fixed display order used when every case type is requested
    pub const ALL: [CaseType; 3] = [CaseType::Confirmed, CaseType::Deaths, CaseType::Recovered];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseType::Confirmed => CONFIRMED,
            CaseType::Deaths => DEATHS,
            CaseType::Recovered => RECOVERED,
        }
    }

    /// Every case type except deaths is rendered as "<n> <type> cases"
    pub fn takes_cases_suffix(&self) -> bool {
        !matches!(self, CaseType::Deaths)
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseType {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            CONFIRMED => Ok(CaseType::Confirmed),
            DEATHS => Ok(CaseType::Deaths),
            RECOVERED => Ok(CaseType::Recovered),
            other => Err(StatsError::UnknownCaseType(other.to_string())),
        }
    }
}

/// Which case types a request asked for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaseTypeSelection {
    /// The "all" sentinel
    #[default]
    All,
    Listed(Vec<CaseType>),
}

impl CaseTypeSelection {
    /// Build a selection from raw intent values.
    ///
    /// Exactly `["all"]` selects everything; otherwise unknown entries are dropped.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        if raw.len() == 1 && raw[0].as_ref().trim().eq_ignore_ascii_case(ALL_CASE_TYPES) {
            return CaseTypeSelection::All;
        }
        let mut listed = Vec::with_capacity(raw.len());
        for value in raw {
            match value.as_ref().parse::<CaseType>() {
                Ok(case_type) => listed.push(case_type),
                Err(e) => warn!("Ignoring case type: {}", e),
            }
        }
        CaseTypeSelection::Listed(listed)
    }

    /// Requested case types in request order
    pub fn case_types(&self) -> Vec<CaseType> {
        match self {
            CaseTypeSelection::All => CaseType::ALL.to_vec(),
            CaseTypeSelection::Listed(types) => types.clone(),
        }
    }
}

/// Integer counts keyed by case type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaseCounts(BTreeMap<CaseType, i64>);

impl CaseCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a case type; absent entries read as zero
    pub fn get(&self, case_type: CaseType) -> i64 {
        self.0.get(&case_type).copied().unwrap_or(0)
    }

    pub fn contains(&self, case_type: CaseType) -> bool {
        self.0.contains_key(&case_type)
    }

    /// Saturates at the i64 bounds
    pub fn add(&mut self, case_type: CaseType, value: i64) {
        let entry = self.0.entry(case_type).or_insert(0);
        *entry = entry.saturating_add(value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CaseType, i64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Keep only the requested case types that are present
    pub fn restricted_to(&self, case_types: &[CaseType]) -> CaseCounts {
        case_types
            .iter()
            .filter_map(|ct| self.0.get(ct).map(|v| (*ct, *v)))
            .collect()
    }
}

impl FromIterator<(CaseType, i64)> for CaseCounts {
    fn from_iter<I: IntoIterator<Item = (CaseType, i64)>>(iter: I) -> Self {
        CaseCounts(iter.into_iter().collect())
    }
}

/// Cumulative per-day history for each case type, sorted by date
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timeline(BTreeMap<CaseType, BTreeMap<DateTime<Utc>, i64>>);

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, case_type: CaseType, at: DateTime<Utc>, cumulative: i64) {
        self.0.entry(case_type).or_default().insert(at, cumulative);
    }

    /// Ensure a (possibly empty) series exists for a case type
    pub fn declare(&mut self, case_type: CaseType) {
        self.0.entry(case_type).or_default();
    }

    pub fn series(&self, case_type: CaseType) -> Option<&BTreeMap<DateTime<Utc>, i64>> {
        self.0.get(&case_type)
    }

    pub fn case_types(&self) -> impl Iterator<Item = CaseType> + '_ {
        self.0.keys().copied()
    }
}

/// One reporting unit (county, province or country) as returned upstream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationRecord {
    pub country: String,
    pub country_code: String,
    pub province: String,
    pub county: String,
    pub latest: CaseCounts,
    pub timelines: Timeline,
}

/// Inclusive epoch-millisecond bounds; an inverted range simply matches nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_epoch_millis: i64,
    pub end_epoch_millis: i64,
}

impl DateRange {
    pub fn new(start_epoch_millis: i64, end_epoch_millis: i64) -> Self {
        Self { start_epoch_millis, end_epoch_millis }
    }

    pub fn contains(&self, epoch_millis: i64) -> bool {
        epoch_millis >= self.start_epoch_millis && epoch_millis <= self.end_epoch_millis
    }
}

/// A country as extracted by the NLU layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    #[serde(rename = "alpha-2")]
    pub alpha2: String,
}

/// The time component of a location query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeParam {
    /// "since then": from the instant up to now
    Instant(DateTime<FixedOffset>),
    Between {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/// Parsed intent parameters for a location query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryFilters {
    pub case_types: CaseTypeSelection,
    pub counties: Vec<String>,
    pub provinces: Vec<String>,
    pub countries: Vec<Country>,
    pub date_time: Option<DateTimeParam>,
}

/// Location name to counts, in display order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSet {
    entries: Vec<(String, CaseCounts)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CaseCounts> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CaseCounts)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Insert or replace; a replaced entry keeps its original position
    pub fn insert(&mut self, name: impl Into<String>, counts: CaseCounts) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = counts,
            None => self.entries.push((name, counts)),
        }
    }

    /// First occurrence seeds the entry; later ones add into the seeded case types
    pub fn merge_sum(&mut self, name: impl Into<String>, counts: CaseCounts) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => {
                let seeded: Vec<CaseType> = existing.iter().map(|(ct, _)| ct).collect();
                for case_type in seeded {
                    existing.add(case_type, counts.get(case_type));
                }
            }
            None => self.entries.push((name, counts)),
        }
    }
}
