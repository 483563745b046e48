//! Starter content for new course sites.
//!
//! `new_course` lays out a fresh course and never overwrites anything.
//! `sync_templates` refreshes the managed templates and static assets of an
//! existing course, rewriting only files whose content differs.

use crate::error::{OfcourseError, Result};
use crate::io;
use crate::paths;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file shipped with ofcourse, relative to the course root.
#[derive(Debug, Clone, Copy)]
pub struct Starter {
    pub path: &'static str,
    pub contents: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Exists,
    Updated,
    Unchanged,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Created => "created",
            FileStatus::Exists => "exists",
            FileStatus::Updated => "updated",
            FileStatus::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub files: Vec<(PathBuf, FileStatus)>,
}

impl ScaffoldReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|(_, s)| *s == status).count()
    }

    fn record(&mut self, path: PathBuf, status: FileStatus) {
        debug!(path = %path.display(), status = status.as_str(), "scaffold");
        self.files.push((path, status));
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Lay out a new course under `root`. The sample participant goes in the
/// `people/<year>/<season>` directory for `today`.
pub fn new_course(root: &Path, today: NaiveDate) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for starter in TEMPLATE_FILES.iter().chain(STATIC_FILES).chain(COURSE_FILES) {
        write_new(root, starter, &mut report)?;
    }

    let term = paths::term_dir(root, today);
    io::ensure_dir(&term)?;
    let sample = term.join(SAMPLE_PARTICIPANT_FILE);
    let status = if io::write_if_missing(&sample, SAMPLE_PARTICIPANT.as_bytes())? {
        FileStatus::Created
    } else {
        FileStatus::Exists
    };
    report.record(sample, status);

    Ok(report)
}

/// Refresh templates and static assets in an existing course.
pub fn sync_templates(root: &Path) -> Result<ScaffoldReport> {
    let templates = paths::templates_dir(root);
    if !templates.is_dir() {
        return Err(OfcourseError::TemplatesMissing(
            templates.display().to_string(),
        ));
    }

    let mut report = ScaffoldReport::default();
    for starter in TEMPLATE_FILES.iter().chain(STATIC_FILES) {
        let path = root.join(starter.path);
        let status = if io::write_if_changed(&path, starter.contents.as_bytes())? {
            FileStatus::Updated
        } else {
            FileStatus::Unchanged
        };
        report.record(path, status);
    }
    Ok(report)
}

fn write_new(root: &Path, starter: &Starter, report: &mut ScaffoldReport) -> Result<()> {
    let path = root.join(starter.path);
    let status = if io::write_if_missing(&path, starter.contents.as_bytes())? {
        FileStatus::Created
    } else {
        FileStatus::Exists
    };
    report.record(path, status);
    Ok(())
}

// ---------------------------------------------------------------------------
// Starter content
// ---------------------------------------------------------------------------

pub const TEMPLATE_FILES: &[Starter] = &[
    Starter {
        path: "templates/base.mak",
        contents: BASE_TEMPLATE,
    },
    Starter {
        path: "templates/index.mak",
        contents: INDEX_TEMPLATE,
    },
    Starter {
        path: "templates/participants.mak",
        contents: PARTICIPANTS_TEMPLATE,
    },
];

pub const STATIC_FILES: &[Starter] = &[Starter {
    path: "static/css/site.css",
    contents: SITE_CSS,
}];

pub const COURSE_FILES: &[Starter] = &[
    Starter {
        path: paths::README_FILE,
        contents: README,
    },
    Starter {
        path: paths::SITE_FILE,
        contents: SITE_YAML,
    },
    Starter {
        path: paths::ASSIGNMENTS_FILE,
        contents: ASSIGNMENTS_YAML,
    },
    Starter {
        path: paths::OER_FILE,
        contents: OER_YAML,
    },
    Starter {
        path: paths::TRAVIS_FILE,
        contents: TRAVIS_YML,
    },
];

pub const SAMPLE_PARTICIPANT_FILE: &str = "fake_student.yaml";

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>${self.title()}</title>
  <link rel="stylesheet" href="/static/css/site.css">
</head>
<body>
  <header><h1>${self.title()}</h1></header>
  <main>
    ${self.body()}
  </main>
</body>
</html>

<%def name="title()">Course</%def>
"#;

const INDEX_TEMPLATE: &str = r#"<%inherit file="base.mak"/>
<%def name="title()">${course['name']}</%def>

<h2>Assignments</h2>
<ul>
% for assignment in assignments:
  <li>${assignment['title']} (due ${assignment.get('due', 'TBA')})</li>
% endfor
</ul>
"#;

const PARTICIPANTS_TEMPLATE: &str = r#"<%inherit file="base.mak"/>
<%def name="title()">Participants</%def>

<table>
  <tr><th>Name</th><th>Submissions</th></tr>
% for person in people:
  <tr>
    <td>${person['name']}</td>
    <td>${len(person['submissions'])}</td>
  </tr>
% endfor
</table>
"#;

const SITE_CSS: &str = r#"body {
  font-family: sans-serif;
  margin: 0 auto;
  max-width: 60em;
  padding: 0 1em;
}

header h1 {
  border-bottom: 2px solid #513127;
}

table {
  border-collapse: collapse;
  width: 100%;
}

td, th {
  border-bottom: 1px solid #ddd;
  padding: 0.4em;
  text-align: left;
}
"#;

const README: &str = r#"# Course Site

Generated by `ofcourse new`.

- `site.yaml` holds course-wide settings, including `course.openshift.app_name`.
- `assignments.yaml` lists every assignment participants may submit.
- `people/<year>/<season>/` holds one YAML file per participant.

Run `ofcourse validate` before committing, and `ofcourse deploy` to publish.
"#;

const SITE_YAML: &str = r#"course:
  name: Your Course Name
  description: What this course is about
  instructor: Your Name
  openshift:
    app_name: mycourse
"#;

const ASSIGNMENTS_YAML: &str = r#"- id: firstflight
  title: First Flight
  due: 2026-09-04
- id: bugfix
  title: Fix a Bug
  due: 2026-10-02
"#;

const OER_YAML: &str = r#"# Open educational resources referenced by the course.
resources:
  - title: Producing Open Source Software
    url: https://producingoss.com/
"#;

const TRAVIS_YML: &str = r#"language: rust
install:
  - cargo install ofcourse-cli
script:
  - ofcourse validate
"#;

const SAMPLE_PARTICIPANT: &str = r#"name: Fake Student
id: fstudent
irc: fakestudent
github: fakestudent
blog: https://fakestudent.example.com/
feed: https://fakestudent.example.com/feed.xml
forges:
  - https://github.com/fakestudent
submissions:
  - assignment: firstflight
    status: done
    url: https://fakestudent.example.com/first-flight
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
