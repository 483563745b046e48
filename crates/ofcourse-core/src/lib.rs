pub mod config;
pub mod credentials;
pub mod deploy;
pub mod error;
pub mod io;
pub mod openshift;
pub mod paths;
pub mod prompt;
pub mod scaffold;
pub mod schema;
pub mod validate;
pub mod vcs;

pub use error::{OfcourseError, Result};
