//! @ai:module:intent Simulation result charting library
//! @ai:module:layer application
//! @ai:module:public_api config, error, results, report

pub mod config;
pub mod error;
pub mod report;
pub mod results;

pub use config::{FailurePolicy, ReportConfig};
pub use error::{Error, Result};
pub use report::{ChartKind, RenderOutcome, ReportRenderer};
pub use results::{ScenarioKey, SummaryRecord, SummaryTable};
