//! @ai:module:intent Summary records keyed by replications and duration
//! @ai:module:layer domain
//! @ai:module:public_api ScenarioKey, Minutes, SummaryRecord, SummaryTable
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

const MINUTES_PER_DAY: f64 = 60.0 * 24.0;

/// @ai:intent Simulated duration in minutes with a total order
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minutes(f64);

impl Minutes {
    /// @ai:intent Wrap a minute count
    /// @ai:effects pure
    pub fn new(value: f64) -> Self {
        // -0.0 and 0.0 must compare and hash alike
        Self(if value == 0.0 { 0.0 } else { value })
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn days(self) -> f64 {
        self.0 / MINUTES_PER_DAY
    }

    /// @ai:intent Axis label for this duration, whole days with a unit suffix
    /// @ai:effects pure
    pub fn day_label(self) -> String {
        format!("{:.0}天", self.days())
    }
}

impl PartialEq for Minutes {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Minutes {}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minutes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Minutes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl std::fmt::Display for Minutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// @ai:intent Parameter pair one result file was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub replications: u32,
    pub duration: Minutes,
}

impl ScenarioKey {
    pub fn new(replications: u32, duration: f64) -> Self {
        Self {
            replications,
            duration: Minutes::new(duration),
        }
    }
}

impl std::fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.replications, self.duration)
    }
}

/// @ai:intent The "Average" row of one result file, plus its "Std Dev" row if present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub metrics: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<BTreeMap<String, f64>>,
}

impl SummaryRecord {
    pub fn new(metrics: BTreeMap<String, f64>) -> Self {
        Self {
            metrics,
            std_dev: None,
        }
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }

    pub fn std_dev(&self, metric: &str) -> Option<f64> {
        self.std_dev.as_ref().and_then(|s| s.get(metric).copied())
    }
}

/// @ai:intent In-memory mapping from scenario to its summary record
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    records: BTreeMap<ScenarioKey, SummaryRecord>,
}

impl SummaryTable {
    /// @ai:intent Create an empty table
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Insert a record; the previous record for the key is returned and replaced
    /// @ai:effects pure
    pub fn insert(&mut self, key: ScenarioKey, record: SummaryRecord) -> Option<SummaryRecord> {
        self.records.insert(key, record)
    }

    pub fn get(&self, key: &ScenarioKey) -> Option<&SummaryRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScenarioKey, &SummaryRecord)> {
        self.records.iter()
    }

    /// @ai:intent Distinct durations across all keys, ascending
    /// @ai:effects pure
    pub fn durations(&self) -> Vec<Minutes> {
        self.records
            .keys()
            .map(|k| k.duration)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// @ai:intent Distinct replication counts across all keys, ascending
    /// @ai:effects pure
    pub fn replications(&self) -> Vec<u32> {
        self.records
            .keys()
            .map(|k| k.replications)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// @ai:intent Union of metric names across all records
    /// @ai:effects pure
    pub fn metric_names(&self) -> Vec<String> {
        self.records
            .values()
            .flat_map(|r| r.metrics.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// @ai:intent Look up one metric value for a scenario
    /// @ai:pre the metric was validated at parse time
    /// @ai:effects pure
    pub fn value(&self, replications: u32, duration: Minutes, metric: &str) -> Result<f64> {
        let key = ScenarioKey {
            replications,
            duration,
        };
        let record = self.records.get(&key).ok_or(Error::Lookup {
            replications,
            duration: duration.get(),
        })?;

        record.get(metric).ok_or_else(|| Error::UnknownMetric {
            replications,
            duration: duration.get(),
            metric: metric.to_string(),
        })
    }

    /// @ai:intent Values of one metric for every duration in order
    /// @ai:effects pure
    pub fn series(&self, replications: u32, durations: &[Minutes], metric: &str) -> Result<Vec<f64>> {
        durations
            .iter()
            .map(|d| self.value(replications, *d, metric))
            .collect()
    }
}
