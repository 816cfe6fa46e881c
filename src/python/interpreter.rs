use crate::core::error::{ProvisionError, Result};
use crate::core::ProcessExecutor;
use std::path::{Path, PathBuf};

/// Interpreter names probed on PATH, in order, when no override is given.
const INTERPRETER_CANDIDATES: [&str; 2] = ["python3", "python"];

/// Resolve the interpreter used to create the virtual environment.
///
/// An override is taken verbatim but must point at an executable file.
/// Without one, the first conventional name found on PATH wins. Nothing
/// here touches the filesystem beyond reading metadata, so a resolution
/// failure leaves no side effects behind.
pub fn resolve_interpreter(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if !is_executable(path) {
            return Err(ProvisionError::Interpreter(format!(
                "{} is not an executable file",
                path.display()
            )));
        }
        return Ok(path.to_path_buf());
    }

    for candidate in INTERPRETER_CANDIDATES {
        if let Some(path) = ProcessExecutor::find_in_path(candidate) {
            return Ok(path);
        }
    }

    Err(ProvisionError::Interpreter(
        "no python3 or python found on PATH. Install Python 3 or pass --python /path/to/python"
            .to_string(),
    ))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
