//! @ai:module:intent Parse result file names and their summary rows
//! @ai:module:layer infrastructure
//! @ai:module:public_api RecordParser, ParsedResult, SUMMARY_LABEL, STD_DEV_LABEL
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::results::table::{ScenarioKey, SummaryRecord};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Row label holding the per-metric means
pub const SUMMARY_LABEL: &str = "Average";
/// Row label holding the per-metric standard deviations; optional, first one wins
pub const STD_DEV_LABEL: &str = "Std Dev";

/// @ai:intent One parsed result file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResult {
    pub key: ScenarioKey,
    pub record: SummaryRecord,
}

/// @ai:intent Turns result files into summary records
/// @ai:effects pure (stateless apart from configuration)
#[derive(Debug, Clone)]
pub struct RecordParser {
    prefix: String,
    extension: String,
    required_metrics: Vec<String>,
}

impl RecordParser {
    /// @ai:intent Create a parser for files named `<prefix><r>_<d>.<extension>`
    /// @ai:effects pure
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
            required_metrics: Vec::new(),
        }
    }

    /// @ai:intent Require these metric columns in every file
    /// @ai:effects pure
    pub fn with_required_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    /// @ai:intent Check a file name against `<prefix>*.<extension>`
    /// @ai:effects pure
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(self.prefix.as_str())
            && Path::new(file_name)
                .extension()
                .map(|ext| ext == self.extension.as_str())
                .unwrap_or(false)
    }

    /// @ai:intent Extract replications and duration from a file name
    /// @ai:effects pure
    pub fn parse_file_name(&self, file_name: &str) -> Result<ScenarioKey> {
        let parse_err = |reason: &str| Error::Parse {
            file: file_name.to_string(),
            reason: reason.to_string(),
        };

        let suffix = format!(".{}", self.extension);
        let stem = file_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
            .ok_or_else(|| parse_err("does not match the result file pattern"))?;

        let tokens: Vec<&str> = stem.split('_').collect();
        let [replications, duration] = tokens.as_slice() else {
            return Err(parse_err("expected exactly two underscore-separated parameters"));
        };

        let replications: u32 = replications
            .parse()
            .map_err(|_| parse_err("replications is not a non-negative integer"))?;
        if replications == 0 {
            return Err(parse_err("replications must be positive"));
        }

        let duration: f64 = duration
            .parse()
            .map_err(|_| parse_err("duration is not a number"))?;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(parse_err("duration must be a positive finite number"));
        }

        Ok(ScenarioKey::new(replications, duration))
    }

    /// @ai:intent Parse one result file from disk
    /// @ai:pre path points to a readable CSV file
    /// @ai:effects fs:read
    pub fn parse_file(&self, path: &Path) -> Result<ParsedResult> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Parse {
                file: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;

        let key = self.parse_file_name(file_name)?;
        let file = std::fs::File::open(path)?;
        let record = self.parse_body(path, file)?;

        tracing::debug!(
            "Parsed {} -> {} ({} metrics)",
            path.display(),
            key,
            record.metrics.len()
        );

        Ok(ParsedResult { key, record })
    }

    /// @ai:intent Find the summary row of a CSV body and map it by header
    /// @ai:effects pure
    pub fn parse_body<R: Read>(&self, path: &Path, reader: R) -> Result<SummaryRecord> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<&str> = headers.iter().skip(1).collect();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(*column) {
                return Err(Error::DuplicateMetric {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                });
            }
        }

        let mut average = None;
        let mut std_dev = None;

        for row in csv_reader.records() {
            let row = row?;
            match row.get(0) {
                Some(SUMMARY_LABEL) => {
                    if average.is_some() {
                        return Err(Error::DuplicateSummary {
                            path: path.to_path_buf(),
                        });
                    }
                    average = Some(Self::row_values(path, &columns, &row)?);
                }
                Some(STD_DEV_LABEL) if std_dev.is_some() => {
                    tracing::warn!(
                        "Ignoring repeated \"{}\" row in {}",
                        STD_DEV_LABEL,
                        path.display()
                    );
                }
                Some(STD_DEV_LABEL) => match Self::row_values(path, &columns, &row) {
                    Ok(values) => std_dev = Some(values),
                    Err(e) => {
                        tracing::warn!("Ignoring \"{}\" row: {}", STD_DEV_LABEL, e);
                        std_dev = Some(BTreeMap::new());
                    }
                },
                _ => {}
            }
        }

        let metrics = average.ok_or_else(|| Error::MissingSummary {
            path: path.to_path_buf(),
        })?;

        if let Some(missing) = self
            .required_metrics
            .iter()
            .find(|m| !metrics.contains_key(m.as_str()))
        {
            return Err(Error::MissingMetric {
                path: path.to_path_buf(),
                metric: missing.clone(),
            });
        }

        let std_dev = std_dev.filter(|values| !values.is_empty());
        Ok(SummaryRecord { metrics, std_dev })
    }

    /// @ai:intent Convert the cells after the label into named values
    /// @ai:effects pure
    fn row_values(
        path: &Path,
        columns: &[&str],
        row: &csv::StringRecord,
    ) -> Result<BTreeMap<String, f64>> {
        columns
            .iter()
            .zip(row.iter().skip(1))
            .map(|(column, cell)| {
                let value = cell.parse::<f64>().map_err(|_| Error::InvalidValue {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                    value: cell.to_string(),
                })?;
                Ok((column.to_string(), value))
            })
            .collect()
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new("results_", "csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = "\
Simulation #,Pump A Max Queue,Avg Fuel Wait A,Clerk Utilization
1,12.00,3.00,40.00
2,13.00,3.40,42.00
Average,12.50,3.20,41.00
Std Dev,0.50,0.20,1.00
";

    fn parse(body: &str) -> Result<SummaryRecord> {
        RecordParser::default().parse_body(Path::new("results_100_1440.csv"), body.as_bytes())
    }

    #[test]
    fn test_file_name_round_trip() {
        let parser = RecordParser::default();
        for (r, d) in [(1u32, 1440.0f64), (10, 14400.0), (300, 525600.0), (7, 90.5)] {
            let key = parser.parse_file_name(&format!("results_{}_{}.csv", r, d)).unwrap();
            assert_eq!(key.replications, r);
            assert_eq!(key.duration.get(), d);
        }
    }

    #[test]
    fn test_file_name_rejects_malformed() {
        let parser = RecordParser::default();
        for name in [
            "results_abc_1440.csv",
            "results_10_xyz.csv",
            "results_10.csv",
            "results_10_1440_extra.csv",
            "results_0_1440.csv",
            "results_10_-5.csv",
            "results_10_1440.txt",
            "summary_10_1440.csv",
        ] {
            let err = parser.parse_file_name(name).unwrap_err();
            assert!(matches!(err, Error::Parse { .. }), "{} should fail", name);
        }
    }

    #[test]
    fn test_metrics_are_header_minus_label() {
        let record = parse(BODY).unwrap();
        let names: Vec<&str> = record.metrics.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Avg Fuel Wait A", "Clerk Utilization", "Pump A Max Queue"]);
        assert_eq!(record.get("Pump A Max Queue"), Some(12.5));
        assert_eq!(record.std_dev("Avg Fuel Wait A"), Some(0.2));
    }

    #[test]
    fn test_missing_average_row() {
        let body = "Simulation #,Pump A Max Queue\n1,12.00\n";
        assert!(matches!(parse(body), Err(Error::MissingSummary { .. })));
    }

    #[test]
    fn test_duplicate_average_row() {
        let body = "Simulation #,Pump A Max Queue\nAverage,1.0\nAverage,2.0\n";
        assert!(matches!(parse(body), Err(Error::DuplicateSummary { .. })));
    }

    #[test]
    fn test_non_numeric_cell() {
        let body = "Simulation #,Pump A Max Queue\nAverage,n/a\n";
        match parse(body) {
            Err(Error::InvalidValue { column, value, .. }) => {
                assert_eq!(column, "Pump A Max Queue");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bad_std_dev_row_is_dropped() {
        let body = "Simulation #,Pump A Max Queue\nAverage,12.5\nStd Dev,n/a\nStd Dev,0.4\n";
        let record = parse(body).unwrap();
        assert_eq!(record.get("Pump A Max Queue"), Some(12.5));
        assert_eq!(record.std_dev, None);
    }

    #[test]
    fn test_repeated_std_dev_row_keeps_first() {
        let body = "Simulation #,Pump A Max Queue\nAverage,12.5\nStd Dev,0.3\nStd Dev,0.4\n";
        let record = parse(body).unwrap();
        assert_eq!(record.std_dev("Pump A Max Queue"), Some(0.3));
    }

    #[test]
    fn test_matches_pattern() {
        let parser = RecordParser::default();
        assert!(parser.matches("results_1_1440.csv"));
        assert!(parser.matches("results_x.csv"));
        assert!(!parser.matches("results_1_1440.txt"));
        assert!(!parser.matches("other_1_1440.csv"));
        assert!(RecordParser::new("run-", "tsv").matches("run-1_1440.tsv"));
    }

    #[test]
    fn test_required_metric_missing() {
        let parser = RecordParser::default().with_required_metrics(["Avg Stay Time A"]);
        let err = parser
            .parse_body(Path::new("results_1_1440.csv"), BODY.as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::MissingMetric { metric, .. } if metric == "Avg Stay Time A"));
    }

    #[test]
    fn test_parse_file_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("results_100_1440.csv");
        std::fs::write(&path, BODY).unwrap();

        let parsed = RecordParser::default().parse_file(&path).unwrap();
        assert_eq!(parsed.key, ScenarioKey::new(100, 1440.0));
        assert_eq!(parsed.record.get("Pump A Max Queue"), Some(12.5));
    }
}
