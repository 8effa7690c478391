//! @ai:module:intent Chart and summary generation from simulation results
//! @ai:module:layer application
//! @ai:module:public_api ReportRenderer, RenderOutcome, ChartGenerator, ChartKind, JsonReporter, MarkdownReporter

pub mod charts;
pub mod json_report;
pub mod markdown_report;
pub mod projection;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};
pub use projection::{ChartData, ChartKind, ChartStyle, Series};

use crate::config::{FailurePolicy, ReportConfig};
use crate::error::Result;
use crate::results::{RecordParser, ResultLoader, ResultLoaderTrait, SummaryTable};
use std::path::Path;

/// @ai:intent What a chart run produced
#[derive(Debug, Default)]
pub struct RenderOutcome {
    pub scenarios: usize,
    pub written: Vec<String>,
    pub skipped: Vec<(ChartKind, String)>,
}

/// @ai:intent Discovers result files, builds the summary table and draws every chart
pub struct ReportRenderer {
    config: ReportConfig,
    loader: ResultLoader,
    charts: Box<dyn ChartGeneratorTrait>,
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportRenderer {
    /// @ai:intent Create a renderer from configuration
    /// @ai:effects pure
    pub fn new(config: ReportConfig) -> Self {
        let charts = Box::new(ChartGenerator::new(&config.charts));
        Self::with_chart_generator(config, charts)
    }

    /// @ai:intent Create a renderer with a custom chart backend
    /// @ai:effects pure
    pub fn with_chart_generator(config: ReportConfig, charts: Box<dyn ChartGeneratorTrait>) -> Self {
        let parser = RecordParser::new(&config.paths.file_prefix, &config.paths.file_extension)
            .with_required_metrics(ChartKind::all_required_metrics());
        let loader = ResultLoader::new(parser, config.policy.on_invalid_file);

        Self {
            config,
            loader,
            charts,
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// @ai:intent Discover and parse every result file
    /// @ai:effects fs:read
    pub fn load_table(&self) -> Result<SummaryTable> {
        self.loader.load_table(&self.config.paths.input_dir)
    }

    /// @ai:intent Draw all five charts into the output directory
    /// @ai:effects fs:write
    pub fn render_charts(&self, table: &SummaryTable) -> Result<RenderOutcome> {
        let output_dir = &self.config.paths.output_dir;
        std::fs::create_dir_all(output_dir)?;

        let mut outcome = RenderOutcome {
            scenarios: table.len(),
            ..Default::default()
        };

        if table.is_empty() {
            tracing::warn!("No result files found; skipping chart generation");
            return Ok(outcome);
        }

        for kind in ChartKind::ALL {
            match self.render_chart(kind, table, output_dir) {
                Ok(()) => outcome.written.push(kind.file_name().to_string()),
                Err(e) if self.config.policy.on_chart_error == FailurePolicy::Skip => {
                    tracing::warn!("Skipping chart {}: {}", kind, e);
                    outcome.skipped.push((kind, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcome)
    }

    /// @ai:intent Project then draw one chart; nothing is written if projection fails
    /// @ai:effects fs:write
    fn render_chart(&self, kind: ChartKind, table: &SummaryTable, output_dir: &Path) -> Result<()> {
        let data = kind.project(table, &self.config.charts)?;
        self.charts.render(&data, &output_dir.join(kind.file_name()))
    }

    /// @ai:intent Write summary.json and summary.md next to the charts
    /// @ai:effects fs:write
    pub fn export_summary(&self, table: &SummaryTable) -> Result<()> {
        let output_dir = &self.config.paths.output_dir;
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(table, &output_dir.join("summary.json"))?;
        self.markdown.generate(table, &output_dir.join("summary.md"))?;

        tracing::info!("Summary exported to {}", output_dir.display());
        Ok(())
    }

    /// @ai:intent Full pipeline: load, then chart
    /// @ai:effects fs:read, fs:write
    pub fn run(&self) -> Result<RenderOutcome> {
        let table = self.load_table()?;
        self.render_charts(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::results::{ScenarioKey, SummaryRecord};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records what it was asked to draw and writes an empty file
    #[derive(Default)]
    struct RecordingGenerator {
        drawn: Mutex<Vec<ChartData>>,
    }

    impl ChartGeneratorTrait for std::sync::Arc<RecordingGenerator> {
        fn render(&self, data: &ChartData, output_path: &Path) -> Result<()> {
            std::fs::write(output_path, b"")?;
            self.drawn.lock().unwrap().push(data.clone());
            Ok(())
        }
    }

    fn config_for(temp: &TempDir) -> ReportConfig {
        let mut config = ReportConfig::default();
        config.paths.input_dir = temp.path().to_path_buf();
        config.paths.output_dir = temp.path().join("charts");
        config
    }

    fn table(replications: &[u32], durations: &[f64]) -> SummaryTable {
        let mut table = SummaryTable::new();
        for &rep in replications {
            for &d in durations {
                let metrics = ChartKind::all_required_metrics()
                    .into_iter()
                    .map(|m| (m.to_string(), rep as f64))
                    .collect();
                table.insert(ScenarioKey::new(rep, d), SummaryRecord::new(metrics));
            }
        }
        table
    }

    #[test]
    fn test_render_all_five_charts() {
        let temp = TempDir::new().unwrap();
        let recorder = std::sync::Arc::new(RecordingGenerator::default());
        let renderer = ReportRenderer::with_chart_generator(config_for(&temp), Box::new(recorder.clone()));

        let outcome = renderer
            .render_charts(&table(&[1, 10, 100, 300], &[1440.0, 14400.0]))
            .unwrap();

        assert_eq!(
            outcome.written,
            vec![
                "queue_lengths.png",
                "wait_times.png",
                "utilization.png",
                "performance_over_time.png",
                "staff_workload.png"
            ]
        );
        assert_eq!(recorder.drawn.lock().unwrap().len(), 5);
        assert!(temp.path().join("charts").join("staff_workload.png").exists());
    }

    #[test]
    fn test_empty_table_skips_charts() {
        let temp = TempDir::new().unwrap();
        let recorder = std::sync::Arc::new(RecordingGenerator::default());
        let renderer = ReportRenderer::with_chart_generator(config_for(&temp), Box::new(recorder.clone()));

        let outcome = renderer.run().unwrap();

        assert_eq!(outcome.scenarios, 0);
        assert!(outcome.written.is_empty());
        assert!(recorder.drawn.lock().unwrap().is_empty());
        assert!(temp.path().join("charts").is_dir());
    }

    #[test]
    fn test_lookup_failure_aborts_without_writing() {
        let temp = TempDir::new().unwrap();
        let recorder = std::sync::Arc::new(RecordingGenerator::default());
        let renderer = ReportRenderer::with_chart_generator(config_for(&temp), Box::new(recorder.clone()));

        let mut partial = table(&[1, 100, 300], &[1440.0, 14400.0]);
        for (key, record) in table(&[10], &[1440.0]).iter() {
            partial.insert(*key, record.clone());
        }

        let err = renderer.render_charts(&partial).unwrap_err();

        assert!(matches!(err, Error::Lookup { replications: 10, .. }));
        assert!(!temp.path().join("charts").join("queue_lengths.png").exists());
    }

    #[test]
    fn test_skip_policy_keeps_other_charts() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(&temp);
        config.policy.on_chart_error = FailurePolicy::Skip;
        let recorder = std::sync::Arc::new(RecordingGenerator::default());
        let renderer = ReportRenderer::with_chart_generator(config, Box::new(recorder.clone()));

        // Only replications=100 present: utilization works, the rest need 1/10/300
        let outcome = renderer.render_charts(&table(&[100], &[1440.0])).unwrap();

        assert_eq!(outcome.written, vec!["utilization.png"]);
        assert_eq!(outcome.skipped.len(), 4);
        assert!(!temp.path().join("charts").join("wait_times.png").exists());
    }

    #[test]
    fn test_export_summary_files() {
        let temp = TempDir::new().unwrap();
        let renderer = ReportRenderer::new(config_for(&temp));

        renderer.export_summary(&table(&[100], &[1440.0])).unwrap();

        assert!(temp.path().join("charts").join("summary.json").exists());
        assert!(temp.path().join("charts").join("summary.md").exists());
    }
}
