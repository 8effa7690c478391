//! @ai:module:intent Markdown export of the summary table
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::error::Result;
use crate::results::{SummaryRecord, SummaryTable};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown summary export
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Write the summary table as Markdown
    fn generate(&self, table: &SummaryTable, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders the summary table as a Markdown document
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format one cell, with the standard deviation when known
    /// @ai:effects pure
    fn format_cell(record: &SummaryRecord, metric: &str) -> String {
        match (record.get(metric), record.std_dev(metric)) {
            (Some(mean), Some(sd)) => format!("{:.2} ± {:.2}", mean, sd),
            (Some(mean), None) => format!("{:.2}", mean),
            (None, _) => "-".to_string(),
        }
    }

    /// @ai:intent Build the full document
    /// @ai:effects pure
    pub fn render(&self, table: &SummaryTable) -> String {
        let mut output = String::new();
        let metrics = table.metric_names();

        writeln!(output, "# Simulation Summary").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Scenarios:** {}", table.len()).unwrap();
        writeln!(
            output,
            "**Replications:** {}",
            table
                .replications()
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
        .unwrap();
        writeln!(output).unwrap();

        if table.is_empty() {
            writeln!(output, "_No result files found._").unwrap();
            return output;
        }

        write!(output, "| Replications | Duration |").unwrap();
        for metric in &metrics {
            write!(output, " {} |", metric).unwrap();
        }
        writeln!(output).unwrap();

        write!(output, "|---|---|").unwrap();
        for _ in &metrics {
            write!(output, "---|").unwrap();
        }
        writeln!(output).unwrap();

        for (key, record) in table.iter() {
            write!(output, "| {} | {} |", key.replications, key.duration.day_label()).unwrap();
            for metric in &metrics {
                write!(output, " {} |", Self::format_cell(record, metric)).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown export to file
    /// @ai:effects fs:write
    fn generate(&self, table: &SummaryTable, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.render(table))?;
        Ok(())
    }
}
