//! @ai:module:intent CLI for rendering simulation result charts
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sim_report::{
    config::{FailurePolicy, ReportConfig},
    report::{JsonReporter, MarkdownReporter, RenderOutcome, ReportRenderer},
    results::SummaryTable,
};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "sim-report.toml";

#[derive(Parser)]
#[command(name = "sim-report")]
#[command(about = "Render comparison charts from gas station simulation results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all charts (the default when no subcommand is given)
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory for charts
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip malformed result files instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Also write summary.json and summary.md
        #[arg(long)]
        export: bool,
    },

    /// Print the summary table
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing results_*.csv files
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
    Markdown,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sim_report=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => render(
            SourceArgs {
                config: None,
                input: None,
            },
            None,
            false,
            false,
        ),
        Some(Commands::Render {
            source,
            output,
            skip_invalid,
            export,
        }) => render(source, output, skip_invalid, export),
        Some(Commands::Summary { source, format }) => summary(source, format),
        Some(Commands::Init { output }) => init_config(output),
    }
}

/// @ai:intent Run the full chart pipeline
/// @ai:effects fs:read, fs:write
fn render(
    source: SourceArgs,
    output: Option<PathBuf>,
    skip_invalid: bool,
    export: bool,
) -> Result<()> {
    let mut config = load_config(&source)?;

    if let Some(output) = output {
        config.paths.output_dir = output;
    }
    if skip_invalid {
        config.policy.on_invalid_file = FailurePolicy::Skip;
    }

    let renderer = ReportRenderer::new(config);
    let table = renderer.load_table().context("Failed to load result files")?;
    let outcome = renderer
        .render_charts(&table)
        .context("Failed to render charts")?;

    if export {
        renderer.export_summary(&table)?;
    }

    print_outcome(&outcome, &renderer.config().paths.output_dir);
    Ok(())
}

/// @ai:intent Print the summary table in the requested format
/// @ai:effects fs:read, io
fn summary(source: SourceArgs, format: SummaryFormat) -> Result<()> {
    let config = load_config(&source)?;
    let renderer = ReportRenderer::new(config);
    let table = renderer.load_table().context("Failed to load result files")?;

    match format {
        SummaryFormat::Text => print_table(&table),
        SummaryFormat::Json => println!("{}", JsonReporter::new().to_json(&table)?),
        SummaryFormat::Markdown => print!("{}", MarkdownReporter::new().render(&table)),
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = ReportConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults, then apply CLI overrides
/// @ai:effects fs:read
fn load_config(source: &SourceArgs) -> Result<ReportConfig> {
    let mut config = match &source.config {
        Some(p) => ReportConfig::load(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);

            if default_path.exists() {
                ReportConfig::load(&default_path)
                    .with_context(|| format!("Failed to load config {}", default_path.display()))?
            } else {
                ReportConfig::default()
            }
        }
    };

    if let Some(input) = &source.input {
        config.paths.input_dir = input.clone();
    }

    Ok(config)
}

/// @ai:intent Print chart results to console
/// @ai:effects io
fn print_outcome(outcome: &RenderOutcome, output_dir: &std::path::Path) {
    println!();
    println!("Simulation Charts");
    println!("=================");
    println!("Scenarios loaded: {}", outcome.scenarios);
    println!("Output directory: {}", output_dir.display());
    println!();

    for file in &outcome.written {
        println!("  wrote    {}", file);
    }
    for (kind, reason) in &outcome.skipped {
        println!("  skipped  {} ({})", kind.file_name(), reason);
    }
}

/// @ai:intent Print the summary table as aligned text
/// @ai:effects io
fn print_table(table: &SummaryTable) {
    if table.is_empty() {
        println!("No result files found.");
        return;
    }

    for (key, record) in table.iter() {
        println!(
            "replications={:<5} duration={} ({})",
            key.replications,
            key.duration,
            key.duration.day_label()
        );
        println!("{}", "-".repeat(60));
        for (metric, value) in &record.metrics {
            match record.std_dev(metric) {
                Some(sd) => println!("  {:<30} {:>10.2} ± {:.2}", metric, value, sd),
                None => println!("  {:<30} {:>10.2}", metric, value),
            }
        }
        println!();
    }
}
