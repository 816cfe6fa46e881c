use crate::core::error::{ProvisionError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

pub const DEFAULT_VENV_DIR: &str = ".venv";
pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";
pub const DEFAULT_KERNEL_NAME: &str = "deep-learning-venv";
pub const DEFAULT_DISPLAY_NAME: &str = "Python (deep-learning .venv)";

static KERNEL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

/// Settings for one provisioning run. Built once from the command line,
/// validated before any side effect, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub venv_dir: PathBuf,
    pub requirements: PathBuf,
    pub kernel_name: String,
    pub display_name: String,
    pub python_override: Option<PathBuf>,
}

impl ProvisionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.venv_dir.as_os_str().is_empty() {
            return Err(ProvisionError::Config(
                "venv directory cannot be empty".to_string(),
            ));
        }

        if self.requirements.as_os_str().is_empty() {
            return Err(ProvisionError::Config(
                "requirements path cannot be empty".to_string(),
            ));
        }

        if !KERNEL_NAME_RE.is_match(&self.kernel_name) {
            return Err(ProvisionError::Config(format!(
                "kernel name '{}' may only contain ASCII letters/digits and . _ - and must not start with punctuation",
                self.kernel_name
            )));
        }

        if self.display_name.trim().is_empty() {
            return Err(ProvisionError::Config(
                "display name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
