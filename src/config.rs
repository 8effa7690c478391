//! @ai:module:intent Configuration structs for the report renderer
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportConfig, PathConfig, ChartConfig, PolicyConfig, FailurePolicy
//! @ai:module:stateless true

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for a report run
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// @ai:intent Where result files are read from and charts are written to
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

/// @ai:intent Chart selection and canvas settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Replication counts drawn side by side on the queue, wait and stay charts
    #[serde(default = "default_compared_replications")]
    pub compared_replications: Vec<u32>,
    #[serde(default = "default_utilization_replications")]
    pub utilization_replications: u32,
    #[serde(default = "default_workload_replications")]
    pub workload_replications: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Bar width in x-category units; bars sit at -w, 0 and +w around each category
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
}

/// @ai:intent What to do when a file or chart fails
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub on_invalid_file: FailurePolicy,
    #[serde(default)]
    pub on_chart_error: FailurePolicy,
}

/// @ai:intent Abort the run on the first failure, or log it and carry on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            compared_replications: default_compared_replications(),
            utilization_replications: default_utilization_replications(),
            workload_replications: default_workload_replications(),
            width: default_width(),
            height: default_height(),
            font_family: default_font_family(),
            bar_width: default_bar_width(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_file_prefix() -> String {
    "results_".to_string()
}

fn default_file_extension() -> String {
    "csv".to_string()
}

fn default_compared_replications() -> Vec<u32> {
    vec![1, 10, 100, 300]
}

fn default_utilization_replications() -> u32 {
    100
}

fn default_workload_replications() -> u32 {
    300
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    600
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_bar_width() -> f64 {
    0.25
}

impl ReportConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_reference_charts() {
        let config = ReportConfig::default();
        assert_eq!(config.charts.compared_replications, vec![1, 10, 100, 300]);
        assert_eq!(config.charts.utilization_replications, 100);
        assert_eq!(config.charts.workload_replications, 300);
        assert_eq!(config.paths.output_dir, PathBuf::from("charts"));
        assert_eq!(config.policy.on_invalid_file, FailurePolicy::Abort);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ReportConfig = toml::from_str(
            r#"
[charts]
utilization_replications = 10

[policy]
on_invalid_file = "skip"
"#,
        )
        .unwrap();

        assert_eq!(config.charts.utilization_replications, 10);
        assert_eq!(config.charts.workload_replications, 300);
        assert_eq!(config.policy.on_invalid_file, FailurePolicy::Skip);
        assert_eq!(config.policy.on_chart_error, FailurePolicy::Abort);
        assert_eq!(config.paths.file_prefix, "results_");
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sim-report.toml");

        let mut config = ReportConfig::default();
        config.charts.compared_replications = vec![5, 50];
        config.save(&path).unwrap();

        let loaded = ReportConfig::load(&path).unwrap();
        assert_eq!(loaded.charts.compared_replications, vec![5, 50]);
    }
}
