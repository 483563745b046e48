//! Course validation: `site.yaml`, `assignments.yaml` and every participant
//! record under `people/`.
//!
//! Validation never fails through an error channel. Every problem, including
//! missing or unparsable files, becomes a [`ValidationError`] in the returned
//! [`ValidationResult`], and the caller decides what the count means.

use crate::paths;
use crate::schema::{self, Issue};
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// ValidationError / ValidationResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub file: PathBuf,
    /// Dotted path inside the document; empty when the problem is the file itself.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn file_level(file: &Path, message: impl Into<String>) -> Self {
        Self {
            file: file.to_path_buf(),
            field: String::new(),
            message: message.into(),
        }
    }

    fn from_issue(file: &Path, issue: Issue) -> Self {
        Self {
            file: file.to_path_buf(),
            field: issue.field,
            message: issue.message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}: {}", self.file.display(), self.message)
        } else {
            write!(f, "{}: {}: {}", self.file.display(), self.field, self.message)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn extend_issues(&mut self, file: &Path, issues: Vec<Issue>) {
        self.errors
            .extend(issues.into_iter().map(|i| ValidationError::from_issue(file, i)));
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate the conventional layout under a course root.
pub fn validate_course(root: &Path) -> ValidationResult {
    validate(
        &paths::site_path(root),
        &paths::assignments_path(root),
        &paths::people_dir(root),
    )
}

/// Validate a course config, an assignment catalog and every participant
/// record under `people_root`.
///
/// Errors are ordered: course config, catalog, then participant files sorted
/// by path. Within a file, structural problems come first in document order,
/// followed by unknown assignment references.
pub fn validate(course_config: &Path, assignments: &Path, people_root: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    if let Some(doc) = load_document(course_config, &mut result) {
        result.extend_issues(course_config, schema::check(&doc, &schema::COURSE_CONFIG));
    }

    let catalog = load_catalog(assignments, &mut result);
    debug!(assignments = catalog.len(), "loaded assignment catalog");

    let files = discover_records(people_root, &mut result);
    for file in &files {
        validate_participant(file, &catalog, &mut result);
    }

    info!(
        files = files.len(),
        errors = result.len(),
        "validated course documents"
    );
    result
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_document(path: &Path, result: &mut ValidationResult) -> Option<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            result.push(ValidationError::file_level(path, "file not found"));
            return None;
        }
        Err(e) => {
            result.push(ValidationError::file_level(path, format!("unreadable: {e}")));
            return None;
        }
    };
    match serde_yaml::from_str(&text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            result.push(ValidationError::file_level(path, format!("invalid YAML: {e}")));
            None
        }
    }
}

/// Load the catalog and return its identifiers, each mapped to its entry index.
/// A missing or unparsable catalog yields an empty map.
fn load_catalog(path: &Path, result: &mut ValidationResult) -> BTreeMap<String, usize> {
    let mut ids = BTreeMap::new();
    let Some(doc) = load_document(path, result) else {
        return ids;
    };
    result.extend_issues(path, schema::check(&doc, &schema::ASSIGNMENT_CATALOG));

    let Some(entries) = doc.as_sequence() else {
        return ids;
    };
    for (i, entry) in entries.iter().enumerate() {
        let Some(id) = entry.get("id").and_then(schema::scalar_string) else {
            continue;
        };
        if let Some(first) = ids.get(&id) {
            result.push(ValidationError {
                file: path.to_path_buf(),
                field: format!("[{i}].id"),
                message: format!("duplicate assignment id '{id}' (first defined at [{first}])"),
            });
        } else {
            ids.insert(id, i);
        }
    }
    ids
}

/// Every `*.yaml` / `*.yml` file below `root`, sorted by path.
fn discover_records(root: &Path, result: &mut ValidationResult) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !root.is_dir() {
        result.push(ValidationError::file_level(
            root,
            "people directory not found",
        ));
        return files;
    }
    walk(root, &mut files, result);
    files.sort();
    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>, result: &mut ValidationResult) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            result.push(ValidationError::file_level(dir, format!("unreadable directory: {e}")));
            return;
        }
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            walk(&path, files, result);
        } else if is_yaml(&path) {
            files.push(path);
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

// ---------------------------------------------------------------------------
// Participant records
// ---------------------------------------------------------------------------

fn validate_participant(
    file: &Path,
    catalog: &BTreeMap<String, usize>,
    result: &mut ValidationResult,
) {
    debug!(file = %file.display(), "validating participant record");
    let Some(doc) = load_document(file, result) else {
        return;
    };
    result.extend_issues(file, schema::check(&doc, &schema::PARTICIPANT));

    let Some(submissions) = doc.get("submissions").and_then(Value::as_sequence) else {
        return;
    };
    for (i, submission) in submissions.iter().enumerate() {
        let Some(id) = submission.get("assignment").and_then(schema::scalar_string) else {
            continue;
        };
        if !catalog.contains_key(&id) {
            result.push(ValidationError {
                file: file.to_path_buf(),
                field: format!("submissions[{i}].assignment"),
                message: format!("unknown assignment '{id}'"),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
