//! Failure knowledge base: signature hashing, case directories, JSON index.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{KbError, Result};
use crate::ops_paths::OpsPaths;

/// Hex characters of the SHA-256 digest kept as the dedup key.
const SIGNATURE_LEN: usize = 16;

/// Index mapping failure signatures to their case directories.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorIndex(BTreeMap<String, IndexEntry>);

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IndexEntry {
    pub cases: Vec<String>,
}

impl ErrorIndex {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Record a case path for a signature. Idempotent.
    pub fn add_case(&mut self, signature: &str, case_dir: &Path) {
        let entry = self.0.entry(signature.to_string()).or_default();
        let case = case_dir.to_string_lossy().into_owned();
        if !entry.cases.contains(&case) {
            entry.cases.push(case);
        }
    }

    pub fn cases(&self, signature: &str) -> &[String] {
        self.0
            .get(signature)
            .map(|e| e.cases.as_slice())
            .unwrap_or(&[])
    }
}

/// Deduplication key for an error text: lines are trimmed, blank lines
/// dropped, and the normalized text hashed. Not a security mechanism.
pub fn signature_from_text(text: &str) -> String {
    let normalized: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(normalized.join("\n").as_bytes());
    hex::encode(hasher.finalize())[..SIGNATURE_LEN].to_string()
}

/// Outcome of recording a failure.
#[derive(Debug)]
pub struct RecordedFailure {
    pub signature: String,
    pub case_dir: PathBuf,
}

/// Record an error log in the knowledge base: create the per-signature case
/// directory with its skeleton notes and register it in the index.
pub fn record_failure(paths: &OpsPaths, error_log: &Path) -> Result<RecordedFailure> {
    if !error_log.exists() {
        return Err(KbError::LogNotFound(error_log.to_path_buf()).into());
    }

    let error_text = String::from_utf8_lossy(&fs::read(error_log)?).into_owned();
    record_failure_text(paths, &error_text)
}

/// As [`record_failure`], but from already-loaded error text.
pub fn record_failure_text(paths: &OpsPaths, error_text: &str) -> Result<RecordedFailure> {
    let signature = signature_from_text(error_text);
    let case_dir = paths.kb_cases().join(&signature);
    fs::create_dir_all(&case_dir)?;

    let symptoms = format!(
        "# Symptoms\n\nCaptured: {}\n\n```\n{error_text}\n```\n",
        Utc::now().to_rfc3339(),
    );
    fs::write(case_dir.join("symptoms.md"), symptoms)?;
    fs::write(case_dir.join("root_cause.md"), "# Root Cause\n\nTBD\n")?;
    fs::write(case_dir.join("fix.md"), "# Fix\n\nTBD\n")?;
    fs::write(
        case_dir.join("regression_test.md"),
        "# Regression Test\n\nTBD\n",
    )?;

    let index_path = paths.kb_index();
    let mut index = ErrorIndex::load(&index_path)?;
    index.add_case(&signature, &case_dir);
    index.save(&index_path)?;

    Ok(RecordedFailure {
        signature,
        case_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_signature_is_16_hex_chars() {
        let sig = signature_from_text("error: something broke");
        assert_eq!(sig.len(), 16);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_ignores_whitespace_and_blank_lines() {
        let a = signature_from_text("error: boom\n  at main.rs:10\n");
        let b = signature_from_text("  error: boom  \n\n\n at main.rs:10");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_errors_differ() {
        let a = signature_from_text("error: boom");
        let b = signature_from_text("error: bang");
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_failure_creates_case_skeleton() {
        let dir = TempDir::new().unwrap();
        let paths = OpsPaths::new(dir.path());
        let log = dir.path().join("failure.txt");
        fs::write(&log, "error: connection refused\n  at db.rs:42\n").unwrap();

        let recorded = record_failure(&paths, &log).unwrap();
        assert!(recorded.case_dir.join("symptoms.md").exists());
        assert!(recorded.case_dir.join("root_cause.md").exists());
        assert!(recorded.case_dir.join("fix.md").exists());
        assert!(recorded.case_dir.join("regression_test.md").exists());

        let symptoms = fs::read_to_string(recorded.case_dir.join("symptoms.md")).unwrap();
        assert!(symptoms.contains("connection refused"));
    }

    #[test]
    fn test_record_failure_missing_log_errors() {
        let dir = TempDir::new().unwrap();
        let paths = OpsPaths::new(dir.path());
        assert!(record_failure(&paths, &dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn test_recording_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = OpsPaths::new(dir.path());

        let first = record_failure_text(&paths, "error: boom\n").unwrap();
        let second = record_failure_text(&paths, "  error: boom\n\n").unwrap();
        assert_eq!(first.signature, second.signature);
        assert_eq!(first.case_dir, second.case_dir);

        let index = ErrorIndex::load(&paths.kb_index()).unwrap();
        assert_eq!(index.cases(&first.signature).len(), 1);
    }

    #[test]
    fn test_index_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error_index.json");

        let mut index = ErrorIndex::default();
        index.add_case("deadbeef00000000", Path::new("cases/deadbeef00000000"));
        index.save(&path).unwrap();

        let loaded = ErrorIndex::load(&path).unwrap();
        assert_eq!(
            loaded.cases("deadbeef00000000"),
            &["cases/deadbeef00000000".to_string()]
        );
        assert!(loaded.cases("unknown").is_empty());
    }
}
