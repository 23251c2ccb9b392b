//! Data persistence and file operations

pub mod opportunities;
pub mod executions;

pub use opportunities::*;
pub use executions::*;

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use crate::errors::{EngineError, EngineResult};

/// Append one JSON line to the dated file `{dir}/{prefix}_{YYYY-MM-DD}.jsonl`.
pub(crate) fn append_jsonl(dir: &str, prefix: &str, line: &str) -> EngineResult<()> {
    let filename = format!("{}/{}_{}.jsonl", dir, prefix, Utc::now().format("%Y-%m-%d"));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&filename)
        .map_err(|e| EngineError::Storage {
            context: format!("opening {}", filename),
            source: e.into(),
        })?;

    writeln!(file, "{}", line).map_err(|e| EngineError::Storage {
        context: format!("appending to {}", filename),
        source: e.into(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_into_missing_directory_is_a_storage_error() {
        let err = append_jsonl("/nonexistent-storage-root/sub", "records", "{}").unwrap_err();
        assert!(matches!(err, EngineError::Storage { .. }));
    }

    #[test]
    fn append_creates_and_extends_the_dated_file() {
        let dir = std::env::temp_dir().join(format!("jsonl-sink-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let dir = dir.to_str().unwrap();

        append_jsonl(dir, "records", "{\"a\":1}").unwrap();
        append_jsonl(dir, "records", "{\"a\":2}").unwrap();

        let filename =
            format!("{}/records_{}.jsonl", dir, Utc::now().format("%Y-%m-%d"));
        let contents = std::fs::read_to_string(filename).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
