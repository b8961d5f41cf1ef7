use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::date_to_day_key;

/// Seconds spent per domain during one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayUsage(BTreeMap<String, u64>);

impl DayUsage {
    pub fn add(&mut self, domain: &str, seconds: u64) {
        let entry = self.0.entry(domain.to_owned()).or_default();
        *entry = entry.saturating_add(seconds);
    }

    pub fn seconds(&self, domain: &str) -> u64 {
        self.0.get(domain).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(domain, seconds)| (domain.as_str(), *seconds))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().fold(0, |total, seconds| total.saturating_add(*seconds))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for DayUsage {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Storage key of a day's usage.
pub fn usage_key(date: NaiveDate) -> String {
    format!("usage:{}", date_to_day_key(date))
}

/// Whole seconds between two ticks, rounded to nearest. A clock that went backwards yields 0
/// instead of shrinking counters.
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let millis = (to - from).num_milliseconds().max(0) as u64;
    (millis + 500) / 1000
}
