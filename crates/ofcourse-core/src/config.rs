use crate::error::{OfcourseError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CARTRIDGE: &str = "python-2.7";

// ---------------------------------------------------------------------------
// OpenShiftConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenShiftConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default = "default_cartridge")]
    pub cartridge: String,
}

fn default_cartridge() -> String {
    DEFAULT_CARTRIDGE.to_string()
}

// ---------------------------------------------------------------------------
// CourseSection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openshift: Option<OpenShiftConfig>,
}

// ---------------------------------------------------------------------------
// CourseConfig (site.yaml)
// ---------------------------------------------------------------------------

/// Deployment settings read from `site.yaml`.
///
/// Every key is optional here: deploy only takes fallbacks from this file,
/// and a missing key just leaves that value unresolved. Required keys are
/// enforced by `validate` through [`crate::schema::COURSE_CONFIG`]. Unknown
/// keys are ignored so that site templates may carry their own settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseConfig {
    #[serde(default)]
    pub course: CourseSection,
}

impl CourseConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::site_path(root);
        if !path.exists() {
            return Err(OfcourseError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&data)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }

    /// Load `site.yaml` if it exists. A missing file is not an error.
    pub fn load_if_present(root: &Path) -> Result<Option<Self>> {
        if !paths::site_path(root).exists() {
            return Ok(None);
        }
        Self::load(root).map(Some)
    }

    pub fn app_name(&self) -> Option<&str> {
        self.openshift().and_then(|o| o.app_name.as_deref())
    }

    pub fn domain(&self) -> Option<&str> {
        self.openshift().and_then(|o| o.domain.as_deref())
    }

    pub fn cartridge(&self) -> &str {
        self.openshift()
            .map(|o| o.cartridge.as_str())
            .unwrap_or(DEFAULT_CARTRIDGE)
    }

    fn openshift(&self) -> Option<&OpenShiftConfig> {
        self.course.openshift.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_openshift_block() {
        let yaml = "course:\n  name: HFOSS\n  openshift:\n    app_name: hfoss\n    domain: rit\n";
        let cfg: CourseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.app_name(), Some("hfoss"));
        assert_eq!(cfg.domain(), Some("rit"));
        assert_eq!(cfg.cartridge(), DEFAULT_CARTRIDGE);
    }

    #[test]
    fn openshift_block_is_optional() {
        let yaml = "course:\n  name: HFOSS\n  instructor: someone\n";
        let cfg: CourseConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.course.openshift.is_none());
        assert_eq!(cfg.app_name(), None);

        let out = serde_yaml::to_string(&cfg).unwrap();
        assert!(!out.contains("openshift"));
    }

    #[test]
    fn load_if_present_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(CourseConfig::load_if_present(dir.path()).unwrap().is_none());
    }

    #[test]
    fn load_missing_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let err = CourseConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, OfcourseError::ConfigNotFound(_)));
    }

    #[test]
    fn load_reads_site_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("site.yaml"),
            "course:\n  name: Intro\n  openshift:\n    app_name: mysite\n    cartridge: python-3.3\n",
        )
        .unwrap();
        let cfg = CourseConfig::load_if_present(dir.path()).unwrap().unwrap();
        assert_eq!(cfg.course.name.as_deref(), Some("Intro"));
        assert_eq!(cfg.app_name(), Some("mysite"));
        assert_eq!(cfg.cartridge(), "python-3.3");
    }

    #[test]
    fn missing_course_name_still_gives_fallbacks() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("site.yaml"),
            "course:\n  openshift:\n    app_name: mysite\n",
        )
        .unwrap();
        let cfg = CourseConfig::load_if_present(dir.path()).unwrap().unwrap();
        assert_eq!(cfg.course.name, None);
        assert_eq!(cfg.app_name(), Some("mysite"));
    }

    #[test]
    fn missing_course_key_resolves_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("site.yaml"), "title: My Course\n").unwrap();
        let cfg = CourseConfig::load_if_present(dir.path()).unwrap().unwrap();
        assert_eq!(cfg.app_name(), None);
        assert_eq!(cfg.domain(), None);
        assert_eq!(cfg.cartridge(), DEFAULT_CARTRIDGE);
    }

    #[test]
    fn openshift_block_without_app_name_is_accepted() {
        let cfg: CourseConfig =
            serde_yaml::from_str("course:\n  openshift:\n    domain: rit\n").unwrap();
        assert_eq!(cfg.app_name(), None);
        assert_eq!(cfg.domain(), Some("rit"));
    }

    #[test]
    fn empty_site_yaml_is_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("site.yaml"), "").unwrap();
        let cfg = CourseConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, CourseConfig::default());
    }
}
