//! Labeled dataset loading and the intermediate JSON dump.
//!
//! The dataset is tab-separated with exactly 3 columns: persona (unused),
//! summary text, and a truthy/falsy expected label. The header row is
//! discarded but its width is validated before anything else happens.

use crate::error::{Result, TriageError};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Number of columns every row must have
const COLUMN_COUNT: usize = 3;

/// Labels equal to this string (case-insensitively) mean "interested"
const TRUTHY_LABEL: &str = "true";

/// Fixed relative path for the JSON dump written before scoring
pub const DUMP_PATH: &str = "./data.json";

/// One labeled example: a paper summary and whether the researcher was
/// actually interested in it.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledExample {
    pub summary: String,
    pub interested: bool,
}

/// Load the labeled dataset from a tab-separated file.
///
/// A header or row with the wrong column count is a dataset error; no
/// best-effort row skipping.
pub fn load_dataset(path: &Path) -> Result<Vec<LabeledExample>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TriageError::Dataset(format!("Failed to open {:?}: {}", path, e)))?;

    let header_len = reader
        .headers()
        .map_err(|e| TriageError::Dataset(format!("Failed to read header: {}", e)))?
        .len();
    if header_len != COLUMN_COUNT {
        return Err(TriageError::Dataset(format!(
            "Expected {} columns, header has {}",
            COLUMN_COUNT, header_len
        )));
    }

    let mut examples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| TriageError::Dataset(format!("Row {}: {}", idx + 1, e)))?;
        if record.len() != COLUMN_COUNT {
            return Err(TriageError::Dataset(format!(
                "Row {}: expected {} columns, got {}",
                idx + 1,
                COLUMN_COUNT,
                record.len()
            )));
        }

        // Columns: persona (unused), summary, expected label
        let summary = record[1].trim().to_string();
        let interested = record[2].trim().eq_ignore_ascii_case(TRUTHY_LABEL);
        examples.push(LabeledExample {
            summary,
            interested,
        });
    }

    info!(count = examples.len(), path = ?path, "Loaded dataset");
    Ok(examples)
}

/// Write the parsed dataset as JSON.
pub fn dump_dataset(path: &Path, examples: &[LabeledExample]) -> Result<()> {
    let json = serde_json::to_string(examples)?;
    std::fs::write(path, json)?;
    info!(count = examples.len(), path = ?path, "Dumped parsed dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write");
        file
    }

    #[test]
    fn test_load_dataset() {
        let file = write_dataset(
            "persona\tsummary\tlabel\n\
             alice\tWe study X.\tTrue\n\
             alice\tWe study Y.\tfalse\n",
        );
        let examples = load_dataset(file.path()).expect("load failed");
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].summary, "We study X.");
        assert!(examples[0].interested);
        assert!(!examples[1].interested);
    }

    #[test]
    fn test_label_comparison_is_case_insensitive() {
        let file = write_dataset("persona\tsummary\tlabel\nalice\tX\tTRUE\nalice\tY\tyes\n");
        let examples = load_dataset(file.path()).expect("load failed");
        assert!(examples[0].interested);
        // Anything other than "true" is "not interested"
        assert!(!examples[1].interested);
    }

    #[test]
    fn test_two_column_header_rejected() {
        let file = write_dataset("summary\tlabel\nX\ttrue\n");
        let err = load_dataset(file.path());
        assert!(matches!(err, Err(TriageError::Dataset(_))));
    }

    #[test]
    fn test_short_row_rejected() {
        let file = write_dataset("persona\tsummary\tlabel\nalice\tX\n");
        let err = load_dataset(file.path());
        assert!(matches!(err, Err(TriageError::Dataset(_))));
    }

    #[test]
    fn test_dump_dataset() {
        let examples = vec![LabeledExample {
            summary: "We study X.".to_string(),
            interested: true,
        }];
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("data.json");
        dump_dataset(&path, &examples).expect("dump failed");

        let content = std::fs::read_to_string(&path).expect("read failed");
        assert!(content.contains("We study X."));
        assert!(content.contains("true"));
    }
}
