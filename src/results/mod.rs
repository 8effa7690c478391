//! @ai:module:intent Simulation result files and the summary table built from them
//! @ai:module:layer domain
//! @ai:module:public_api ScenarioKey, Minutes, SummaryRecord, SummaryTable, RecordParser, ResultLoader

pub mod discovery;
pub mod parser;
pub mod table;

pub use discovery::{ResultLoader, ResultLoaderTrait};
pub use parser::{ParsedResult, RecordParser, STD_DEV_LABEL, SUMMARY_LABEL};
pub use table::{Minutes, ScenarioKey, SummaryRecord, SummaryTable};
