//! File-based persistence for assessments and compliance reports.
//!
//! Documents are keyed by the uploaded filename: each save writes a
//! timestamped JSON file into the configured directory, and lookups return
//! the most recent file matching either the detected standard name (e.g.
//! AS9100D) or the sanitized filename prefix. Compliance reports share the
//! directory but carry a `_compliance_report` tag so the two lookups never
//! collide.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::assessment::ClauseAssessment;
use crate::models::report::ComplianceReport;

const REPORT_TAG: &str = "_compliance_report";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Store rooted at a directory of JSON documents.
#[derive(Clone)]
pub struct AssessmentStore {
    dir: PathBuf,
    standard_patterns: Vec<Regex>,
}

impl AssessmentStore {
    /// Opens the store, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        // Recognized standard designators, checked in order
        let standard_patterns = [
            r"(?i)(AS9100D?)",
            r"(?i)(ISO[_\s]?\d{5})",
            r"(?i)(ISO[_\s]?14001)",
            r"(?i)(ISO[_\s]?9001)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("standard pattern is valid"))
        .collect();

        Ok(Self {
            dir,
            standard_patterns,
        })
    }

    /// Extracts the standard designator (e.g. "AS9100D", "ISO_14001") from an
    /// uploaded filename, falling back to the sanitized base name.
    pub fn extract_standard_name(&self, filename: &str) -> String {
        let base = base_name(filename);
        for pattern in &self.standard_patterns {
            if let Some(m) = pattern.captures(base).and_then(|c| c.get(1)) {
                return m.as_str().to_uppercase().replace(' ', "_");
            }
        }
        sanitize(base)
    }

    /// The most recent stored assessment for this document, if any.
    pub fn find_latest_assessment(&self, filename: &str) -> Option<PathBuf> {
        self.find_latest(filename, false)
    }

    /// The most recent stored compliance report for this document, if any.
    pub fn find_latest_report(&self, filename: &str) -> Option<PathBuf> {
        self.find_latest(filename, true)
    }

    fn find_latest(&self, filename: &str, want_report: bool) -> Option<PathBuf> {
        let safe_name = sanitize(base_name(filename));
        let standard = self.extract_standard_name(filename);
        debug!(
            "Searching stored documents for '{filename}' (safe name: {safe_name}, standard: {standard})"
        );

        let entries = fs::read_dir(&self.dir).ok()?;
        let mut matches: Vec<(PathBuf, SystemTime)> = Vec::new();

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".json") || name.contains(REPORT_TAG) != want_report {
                continue;
            }
            let by_standard = !standard.is_empty() && name.to_uppercase().contains(&standard);
            let by_prefix = if want_report {
                name.contains(&safe_name)
            } else {
                name.starts_with(&format!("{safe_name}_"))
            };
            if by_standard || by_prefix {
                let modified = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                matches.push((entry.path(), modified));
            }
        }

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        let latest = matches.into_iter().next().map(|(path, _)| path);
        match &latest {
            Some(path) => debug!("Found stored document: {}", path.display()),
            None => debug!("No stored document matches '{filename}'"),
        }
        latest
    }

    /// Loads clause assessments from a stored file. Accepts a bare array, an
    /// `{"assessments": [...]}` wrapper, or a single clause object.
    pub fn load_assessments(&self, path: &Path) -> Result<Vec<ClauseAssessment>, AppError> {
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;

        let assessments = match value {
            Value::Array(_) => serde_json::from_value(value)?,
            Value::Object(mut map) => {
                if let Some(inner) = map.remove("assessments") {
                    serde_json::from_value(inner)?
                } else {
                    vec![serde_json::from_value(Value::Object(map))?]
                }
            }
            other => {
                warn!("Stored assessment has unexpected shape: {other:?}");
                return Err(AppError::Validation(
                    "Stored assessment file has an unexpected shape".to_string(),
                ));
            }
        };

        Ok(assessments)
    }

    /// Loads a stored compliance report.
    pub fn load_report(&self, path: &Path) -> Result<ComplianceReport, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Saves a freshly generated assessment under a timestamped name and
    /// returns the path written.
    pub fn save_assessments(
        &self,
        filename: &str,
        assessments: &[ClauseAssessment],
    ) -> Result<PathBuf, AppError> {
        let safe_name = sanitize(base_name(filename));
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let path = self.dir.join(format!("{safe_name}_{timestamp}.json"));
        fs::write(&path, serde_json::to_string_pretty(assessments)?)?;
        info!("Saved assessment to {}", path.display());
        Ok(path)
    }

    /// Writes updated assessments back to an existing file (selection merge).
    pub fn overwrite(
        &self,
        path: &Path,
        assessments: &[ClauseAssessment],
    ) -> Result<(), AppError> {
        fs::write(path, serde_json::to_string_pretty(assessments)?)?;
        Ok(())
    }

    /// Saves a compliance report under a timestamped, tagged name.
    pub fn save_report(
        &self,
        filename: &str,
        report: &ComplianceReport,
    ) -> Result<PathBuf, AppError> {
        let safe_name = sanitize(base_name(filename));
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let path = self
            .dir
            .join(format!("{safe_name}{REPORT_TAG}_{timestamp}.json"));
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        info!("Saved compliance report to {}", path.display());
        Ok(path)
    }
}

/// Filename without its extension.
fn base_name(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Replaces every non-alphanumeric character with '_'.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AssessmentStore) {
        let dir = TempDir::new().unwrap();
        let store = AssessmentStore::new(dir.path()).unwrap();
        (dir, store)
    }

    fn sample_assessment(clause: &str) -> ClauseAssessment {
        serde_json::from_value(serde_json::json!({ "clause": clause })).unwrap()
    }

    #[test]
    fn test_extract_standard_name_patterns() {
        let (_dir, store) = store();
        assert_eq!(store.extract_standard_name("as9100d rev 2016.pdf"), "AS9100D");
        assert_eq!(store.extract_standard_name("ISO 14001-2015.pdf"), "ISO_14001");
        assert_eq!(store.extract_standard_name("iso_9001_2015.pdf"), "ISO_9001");
        assert_eq!(
            store.extract_standard_name("my quality manual.pdf"),
            "my_quality_manual"
        );
    }

    #[test]
    fn test_save_then_find_and_load_roundtrip() {
        let (_dir, store) = store();
        let assessments = vec![sample_assessment("4.1 Context"), sample_assessment("4.2 Parties")];
        store.save_assessments("AS9100D.pdf", &assessments).unwrap();

        let found = store.find_latest_assessment("AS9100D.pdf").unwrap();
        let loaded = store.load_assessments(&found).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].clause, "4.1 Context");
    }

    #[test]
    fn test_lookup_matches_by_standard_name_across_filenames() {
        let (_dir, store) = store();
        store
            .save_assessments("AS9100D_rev2016.pdf", &[sample_assessment("4.1 Context")])
            .unwrap();
        // Different filename, same standard
        assert!(store.find_latest_assessment("as9100d-final.pdf").is_some());
    }

    #[test]
    fn test_reports_do_not_shadow_assessments() {
        let (_dir, store) = store();
        let report = crate::report::scorer::generate_compliance_report(&[]);
        store.save_report("ISO_9001.pdf", &report).unwrap();

        assert!(store.find_latest_assessment("ISO_9001.pdf").is_none());
        let found = store.find_latest_report("ISO_9001.pdf").unwrap();
        let loaded = store.load_report(&found).unwrap();
        assert_eq!(loaded.total_clauses, 0);
    }

    #[test]
    fn test_missing_document_returns_none() {
        let (_dir, store) = store();
        assert!(store.find_latest_assessment("unknown.pdf").is_none());
    }

    #[test]
    fn test_load_accepts_wrapper_object() {
        let (dir, store) = store();
        let path = dir.path().join("wrapped.json");
        fs::write(
            &path,
            r#"{"assessments": [{"clause": "5.1 Leadership"}]}"#,
        )
        .unwrap();
        let loaded = store.load_assessments(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].clause, "5.1 Leadership");
    }

    #[test]
    fn test_load_accepts_single_object() {
        let (dir, store) = store();
        let path = dir.path().join("single.json");
        fs::write(&path, r#"{"clause": "5.1 Leadership"}"#).unwrap();
        let loaded = store.load_assessments(&path).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_overwrite_updates_in_place() {
        let (_dir, store) = store();
        let path = store
            .save_assessments("ISO_9001.pdf", &[sample_assessment("4.1 Context")])
            .unwrap();

        let mut assessments = store.load_assessments(&path).unwrap();
        assessments[0].selected_maturity_level = Some(3);
        store.overwrite(&path, &assessments).unwrap();

        let reloaded = store.load_assessments(&path).unwrap();
        assert_eq!(reloaded[0].selected_maturity_level, Some(3));
    }
}
