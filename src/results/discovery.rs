//! @ai:module:intent Locate simulation result files and assemble the summary table
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResultLoader, ResultLoaderTrait
//! @ai:module:stateless true

use crate::config::FailurePolicy;
use crate::error::Result;
use crate::results::parser::RecordParser;
use crate::results::table::SummaryTable;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Trait for loading result files into a summary table
pub trait ResultLoaderTrait: Send + Sync {
    /// @ai:intent List result files in a directory
    fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>>;

    /// @ai:intent Parse every result file into one table
    fn load_table(&self, input_dir: &Path) -> Result<SummaryTable>;
}

/// @ai:intent Loads result files from a flat directory
pub struct ResultLoader {
    parser: RecordParser,
    policy: FailurePolicy,
}

impl ResultLoader {
    /// @ai:intent Create a loader; the parser decides which file names match
    /// @ai:effects pure
    pub fn new(parser: RecordParser, policy: FailurePolicy) -> Self {
        Self { parser, policy }
    }
}

impl Default for ResultLoader {
    fn default() -> Self {
        Self::new(RecordParser::default(), FailurePolicy::Abort)
    }
}

impl ResultLoaderTrait for ResultLoader {
    /// @ai:intent List matching files, sorted by path
    /// @ai:effects fs:read
    fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let entries = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", input_dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if entry
                .file_name()
                .to_str()
                .map(|name| self.parser.matches(name))
                .unwrap_or(false)
            {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::info!("Found {} result files in {}", files.len(), input_dir.display());
        Ok(files)
    }

    /// @ai:intent Build the summary table, honouring the failure policy
    /// @ai:effects fs:read
    fn load_table(&self, input_dir: &Path) -> Result<SummaryTable> {
        let mut table = SummaryTable::new();

        for path in self.discover(input_dir)? {
            let parsed = match self.parser.parse_file(&path) {
                Ok(parsed) => parsed,
                Err(e) if self.policy == FailurePolicy::Skip => {
                    tracing::warn!("Skipping invalid result file {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if table.insert(parsed.key, parsed.record).is_some() {
                tracing::warn!(
                    "Duplicate results for {}; {} replaces the earlier file",
                    parsed.key,
                    path.display()
                );
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::results::table::ScenarioKey;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn summary(value: f64) -> String {
        format!("Simulation #,Pump A Max Queue\n1,{v}\nAverage,{v}\n", v = value)
    }

    #[test]
    fn test_discover_filters_pattern() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "results_1_1440.csv", &summary(1.0));
        write(temp.path(), "results_10_1440.csv", &summary(2.0));
        write(temp.path(), "results_10_1440.txt", "");
        write(temp.path(), "other.csv", "");
        std::fs::create_dir(temp.path().join("results_dir.csv")).unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();
        write(&temp.path().join("nested"), "results_5_1440.csv", &summary(3.0));

        let loader = ResultLoader::default();
        let files = loader.discover(temp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["results_10_1440.csv", "results_1_1440.csv"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_follows_symlinked_files() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("store");
        let input = temp.path().join("input");
        std::fs::create_dir(&store).unwrap();
        std::fs::create_dir(&input).unwrap();
        write(&store, "a.csv", &summary(4.0));
        std::os::unix::fs::symlink(store.join("a.csv"), input.join("results_1_1440.csv")).unwrap();
        std::os::unix::fs::symlink(store.join("gone.csv"), input.join("results_2_1440.csv")).unwrap();

        let loader = ResultLoader::default();
        let files = loader.discover(&input).unwrap();
        assert_eq!(files, vec![input.join("results_1_1440.csv")]);

        let table = loader.load_table(&input).unwrap();
        assert_eq!(
            table.get(&ScenarioKey::new(1, 1440.0)).unwrap().get("Pump A Max Queue"),
            Some(4.0)
        );
    }

    #[test]
    fn test_custom_pattern_comes_from_parser() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "run-3_1440.tsv", &summary(1.0));
        write(temp.path(), "results_3_1440.csv", &summary(1.0));

        let loader = ResultLoader::new(RecordParser::new("run-", "tsv"), FailurePolicy::Abort);
        let files = loader.discover(temp.path()).unwrap();
        assert_eq!(files, vec![temp.path().join("run-3_1440.tsv")]);
    }

    #[test]
    fn test_empty_directory_gives_empty_table() {
        let temp = TempDir::new().unwrap();
        let table = ResultLoader::default().load_table(temp.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_abort_on_invalid_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "results_1_1440.csv", &summary(1.0));
        write(temp.path(), "results_x_1440.csv", &summary(1.0));

        let err = ResultLoader::default().load_table(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_skip_invalid_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "results_1_1440.csv", &summary(1.0));
        write(temp.path(), "results_2_1440.csv", "Simulation #,Pump A Max Queue\n1,1.0\n");

        let loader = ResultLoader::new(RecordParser::default(), FailurePolicy::Skip);
        let table = loader.load_table(temp.path()).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.get(&ScenarioKey::new(1, 1440.0)).is_some());
    }

    #[test]
    fn test_equivalent_durations_collapse_to_one_key() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "results_1_1440.csv", &summary(1.0));
        write(temp.path(), "results_1_1440.0.csv", &summary(2.0));

        let table = ResultLoader::default().load_table(temp.path()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
