use crate::digest::DigestAlgorithm;
use crate::error::{HarnessError, Result};
use crate::runner::DEFAULT_ITERATIONS;
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Overrides the resource root when no root is given explicitly.
pub const RESOURCE_ROOT_ENV: &str = "RASTERBENCH_RESOURCE_ROOT";

pub const DEFAULT_RESOURCE_ROOT: &str = "resources";

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
  /// Directory holding `<name>.svg` inputs and `<name>-reference.png` goldens.
  pub resource_root: PathBuf,
  /// Render iterations per case.
  pub iterations: NonZeroU32,
  pub digest: DigestAlgorithm,
  /// Resolve text against the host's fonts.
  pub system_fonts: bool,
  /// Restrict the run to these case names.
  pub cases: Option<Vec<String>>,
  /// Where to write the JSON run summary, if anywhere.
  pub summary_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
  fn default() -> Self {
    Self {
      resource_root: PathBuf::from(DEFAULT_RESOURCE_ROOT),
      iterations: DEFAULT_ITERATIONS,
      digest: DigestAlgorithm::Md5,
      system_fonts: false,
      cases: None,
      summary_path: None,
    }
  }
}

impl HarnessConfig {
  pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.resource_root = root.into();
    self
  }

  pub fn with_iterations(mut self, iterations: NonZeroU32) -> Self {
    self.iterations = iterations;
    self
  }

  pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
    self.digest = digest;
    self
  }

  pub fn with_system_fonts(mut self, enabled: bool) -> Self {
    self.system_fonts = enabled;
    self
  }

  pub fn with_cases(mut self, cases: Option<Vec<String>>) -> Self {
    self.cases = cases;
    self
  }

  pub fn with_summary_path(mut self, path: Option<PathBuf>) -> Self {
    self.summary_path = path;
    self
  }

  /// Resolves the resource root: explicit value, then the environment, then the default.
  pub fn resolve_root(explicit: Option<PathBuf>, env_value: Option<PathBuf>) -> PathBuf {
    explicit
      .or_else(|| env_value.filter(|p| !p.as_os_str().is_empty()))
      .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_ROOT))
  }

  /// Reads [`RESOURCE_ROOT_ENV`] from the process environment.
  pub fn root_from_env() -> Option<PathBuf> {
    std::env::var_os(RESOURCE_ROOT_ENV).map(PathBuf::from)
  }

  pub fn validate(&self) -> Result<()> {
    if !self.resource_root.is_dir() {
      return Err(HarnessError::Config(format!(
        "resource root {} is not a directory",
        self.resource_root.display()
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = HarnessConfig::default();
    assert_eq!(config.iterations.get(), 10);
    assert_eq!(config.digest, DigestAlgorithm::Md5);
    assert_eq!(config.resource_root, PathBuf::from("resources"));
    assert!(!config.system_fonts);
  }

  #[test]
  fn explicit_root_wins_over_env() {
    let root = HarnessConfig::resolve_root(Some("cli".into()), Some("env".into()));
    assert_eq!(root, PathBuf::from("cli"));
    let root = HarnessConfig::resolve_root(None, Some("env".into()));
    assert_eq!(root, PathBuf::from("env"));
    let root = HarnessConfig::resolve_root(None, Some(PathBuf::new()));
    assert_eq!(root, PathBuf::from(DEFAULT_RESOURCE_ROOT));
  }

  #[test]
  fn validate_requires_existing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let config = HarnessConfig::default().with_resource_root(tmp.path());
    assert!(config.validate().is_ok());

    let missing = config.with_resource_root(tmp.path().join("nope"));
    let err = missing.validate().unwrap_err();
    assert!(err.to_string().contains("not a directory"));
  }
}
