use crate::error::{OfcourseError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory and file constants
// ---------------------------------------------------------------------------

pub const PEOPLE_DIR: &str = "people";
pub const TEMPLATES_DIR: &str = "templates";

pub const SITE_FILE: &str = "site.yaml";
pub const ASSIGNMENTS_FILE: &str = "assignments.yaml";
pub const OER_FILE: &str = "oer.yaml";
pub const TRAVIS_FILE: &str = ".travis.yml";
pub const README_FILE: &str = "README.md";

/// Token cache, relative to the user's home directory.
pub const TOKEN_FILE: &str = ".ofcourse.token";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn site_path(root: &Path) -> PathBuf {
    root.join(SITE_FILE)
}

pub fn assignments_path(root: &Path) -> PathBuf {
    root.join(ASSIGNMENTS_FILE)
}

pub fn people_dir(root: &Path) -> PathBuf {
    root.join(PEOPLE_DIR)
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(TEMPLATES_DIR)
}

/// `people/<year>/<season>` for the term containing `date`.
pub fn term_dir(root: &Path, date: NaiveDate) -> PathBuf {
    people_dir(root)
        .join(date.year().to_string())
        .join(season(date))
}

/// `~/.ofcourse.token`
pub fn default_token_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(OfcourseError::HomeNotFound)?;
    Ok(home.join(TOKEN_FILE))
}

/// Academic season for a date: spring through May, summer through August,
/// fall for the rest of the year.
pub fn season(date: NaiveDate) -> &'static str {
    match date.month() {
        1..=5 => "spring",
        6..=8 => "summer",
        _ => "fall",
    }
}

// ---------------------------------------------------------------------------
// App name validation
// ---------------------------------------------------------------------------

static APP_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn app_name_re() -> &'static Regex {
    APP_NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9]{1,32}$").unwrap())
}

pub fn is_valid_app_name(name: &str) -> bool {
    app_name_re().is_match(name)
}

pub fn validate_app_name(name: &str) -> Result<()> {
    if !is_valid_app_name(name) {
        return Err(OfcourseError::InvalidAppName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
