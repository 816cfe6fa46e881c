use crate::core::error::{ProvisionError, Result};
use crate::core::ProcessExecutor;
use async_trait::async_trait;
use std::path::Path;

/// Packaging tooling upgraded inside the environment before anything else.
pub const BOOTSTRAP_PACKAGES: [&str; 3] = ["pip", "setuptools", "wheel"];

/// Installed when no requirements manifest is present, so the tool stays
/// usable with zero configuration.
pub const FALLBACK_PACKAGES: [&str; 5] =
    ["numpy", "pandas", "matplotlib", "scikit-learn", "ipython"];

/// Bridge package that lets notebook front-ends talk to the environment.
pub const KERNEL_PACKAGE: &str = "ipykernel";

/// Filter for the freeze hint printed in the summary; covers the package
/// families this tool installs.
pub const FREEZE_FILTER: &str = "numpy|pandas|matplotlib|scikit-learn|ipython|ipykernel";

/// Creates a virtual environment with a given interpreter.
#[async_trait]
pub trait EnvironmentTool: Send + Sync {
    async fn create_env(&self, interpreter: &Path, env_dir: &Path) -> Result<()>;
}

/// Installs packages into an existing environment.
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn upgrade_tooling(&self, python: &Path) -> Result<()>;

    async fn install_manifest(&self, python: &Path, manifest: &Path) -> Result<()>;

    async fn install_packages(&self, python: &Path, packages: &[&str]) -> Result<()>;
}

/// Registers a named notebook kernel for the current user.
#[async_trait]
pub trait KernelRegistrar: Send + Sync {
    async fn register(&self, python: &Path, name: &str, display_name: &str) -> Result<()>;
}

/// Run one provisioning step through the given interpreter, surfacing a
/// non-zero child status as that step's failure. The child inherits stdio,
/// so its own diagnostics are already on the terminal.
async fn run_python_step(step: &'static str, python: &Path, args: &[&str]) -> Result<()> {
    let status = ProcessExecutor::run_streamed(python, args).await?;

    if !status.success() {
        return Err(ProvisionError::StepFailed {
            step,
            status: status.code().unwrap_or(1),
        });
    }

    Ok(())
}

pub struct VenvCli;

#[async_trait]
impl EnvironmentTool for VenvCli {
    async fn create_env(&self, interpreter: &Path, env_dir: &Path) -> Result<()> {
        let env_dir = env_dir.to_string_lossy();
        run_python_step(
            "environment creation",
            interpreter,
            &["-m", "venv", env_dir.as_ref()],
        )
        .await
    }
}

pub struct PipCli;

#[async_trait]
impl PackageInstaller for PipCli {
    async fn upgrade_tooling(&self, python: &Path) -> Result<()> {
        let mut args = vec!["-m", "pip", "install", "--upgrade"];
        args.extend_from_slice(&BOOTSTRAP_PACKAGES);
        run_python_step("packaging tooling upgrade", python, &args).await
    }

    async fn install_manifest(&self, python: &Path, manifest: &Path) -> Result<()> {
        let manifest = manifest.to_string_lossy();
        run_python_step(
            "dependency installation",
            python,
            &["-m", "pip", "install", "-r", manifest.as_ref()],
        )
        .await
    }

    async fn install_packages(&self, python: &Path, packages: &[&str]) -> Result<()> {
        let mut args = vec!["-m", "pip", "install"];
        args.extend_from_slice(packages);
        run_python_step("package installation", python, &args).await
    }
}

pub struct IpykernelCli;

#[async_trait]
impl KernelRegistrar for IpykernelCli {
    async fn register(&self, python: &Path, name: &str, display_name: &str) -> Result<()> {
        run_python_step(
            "kernel registration",
            python,
            &[
                "-m",
                "ipykernel",
                "install",
                "--user",
                "--name",
                name,
                "--display-name",
                display_name,
            ],
        )
        .await
    }
}
