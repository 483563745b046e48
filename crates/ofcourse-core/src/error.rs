use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfcourseError {
    #[error("course config not found at {0}")]
    ConfigNotFound(String),

    #[error("invalid app name '{0}': must be 1-32 lowercase letters or digits")]
    InvalidAppName(String),

    #[error("templates directory not found: {0}")]
    TemplatesMissing(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("git not found in PATH")]
    GitNotInstalled,

    #[error("git {command} failed: {stderr}")]
    GitFailed { command: String, stderr: String },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OfcourseError>;
