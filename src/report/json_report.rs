//! @ai:module:intent JSON export of the summary table
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, SummaryExport
//! @ai:module:stateless true

use crate::error::Result;
use crate::results::SummaryTable;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// @ai:intent Trait for JSON summary export
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write the summary table as JSON
    fn generate(&self, table: &SummaryTable, output_path: &Path) -> Result<()>;
}

/// @ai:intent Serialized shape of the summary table
#[derive(Debug, Serialize)]
pub struct SummaryExport<'a> {
    pub generated_at: String,
    pub scenarios: Vec<ScenarioExport<'a>>,
}

/// @ai:intent One scenario row of the export
#[derive(Debug, Serialize)]
pub struct ScenarioExport<'a> {
    pub replications: u32,
    pub duration_minutes: f64,
    pub duration_days: f64,
    pub average: &'a BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<&'a BTreeMap<String, f64>>,
}

impl<'a> SummaryExport<'a> {
    /// @ai:intent Borrow the table into its export shape
    /// @ai:effects pure
    pub fn from_table(table: &'a SummaryTable) -> Self {
        let scenarios = table
            .iter()
            .map(|(key, record)| ScenarioExport {
                replications: key.replications,
                duration_minutes: key.duration.get(),
                duration_days: key.duration.days(),
                average: &record.metrics,
                std_dev: record.std_dev.as_ref(),
            })
            .collect();

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            scenarios,
        }
    }
}

/// @ai:intent Writes the summary table as pretty JSON
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render the export as a JSON string
    /// @ai:effects pure
    pub fn to_json(&self, table: &SummaryTable) -> Result<String> {
        Ok(serde_json::to_string_pretty(&SummaryExport::from_table(table))?)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON export to file
    /// @ai:effects fs:write
    fn generate(&self, table: &SummaryTable, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.to_json(table)?)?;
        Ok(())
    }
}
