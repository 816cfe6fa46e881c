pub mod config;
pub mod toolchain;

pub use config::ProvisionConfig;

use crate::core::error::Result;
use crate::python::VenvPaths;
use colored::Colorize;
use std::path::Path;
use self::toolchain::{
    EnvironmentTool, KernelRegistrar, PackageInstaller, FALLBACK_PACKAGES, FREEZE_FILTER,
    KERNEL_PACKAGE,
};

/// Runs the provisioning steps in order against the three external-tool
/// collaborators. Side effects are cumulative and never rolled back; the
/// first failing step aborts the remainder.
pub struct Provisioner<E, P, K> {
    env_tool: E,
    installer: P,
    registrar: K,
}

impl<E, P, K> Provisioner<E, P, K>
where
    E: EnvironmentTool,
    P: PackageInstaller,
    K: KernelRegistrar,
{
    pub fn new(env_tool: E, installer: P, registrar: K) -> Self {
        Self {
            env_tool,
            installer,
            registrar,
        }
    }

    pub async fn provision(&self, config: &ProvisionConfig, interpreter: &Path) -> Result<()> {
        let venv = VenvPaths::new(&config.venv_dir);

        println!(
            "{} Provisioning Python environment",
            "⚙".blue().bold()
        );
        println!("  Interpreter: {}", interpreter.display().to_string().yellow());
        println!("  Environment: {}", config.venv_dir.display().to_string().yellow());
        println!("  Kernel: {}", config.kernel_name.yellow());

        // Create the environment unless it is already there. Never
        // re-create or wipe an existing one.
        if venv.exists() {
            println!(
                "{} Virtual environment already exists at {}",
                "ℹ".blue().bold(),
                venv.root().display()
            );
        } else {
            println!(
                "{} Creating virtual environment at {}...",
                "⚙".blue().bold(),
                venv.root().display().to_string().yellow()
            );
            self.env_tool.create_env(interpreter, venv.root()).await?;
            println!("{} Virtual environment created", "✓".green().bold());
        }

        // Every later step runs through the environment's own interpreter.
        let python = venv.python();

        println!(
            "{} Upgrading packaging tooling...",
            "⚙".blue().bold()
        );
        self.installer.upgrade_tooling(&python).await?;

        if config.requirements.exists() {
            println!(
                "{} Installing dependencies from {}...",
                "⚙".blue().bold(),
                config.requirements.display().to_string().yellow()
            );
            self.installer
                .install_manifest(&python, &config.requirements)
                .await?;
        } else {
            println!(
                "{} No {} found; installing fallback set: {}",
                "ℹ".blue().bold(),
                config.requirements.display(),
                FALLBACK_PACKAGES.join(" ").yellow()
            );
            self.installer
                .install_packages(&python, &FALLBACK_PACKAGES)
                .await?;
        }

        println!(
            "{} Registering kernel {}...",
            "⚙".blue().bold(),
            config.kernel_name.cyan()
        );
        self.installer
            .install_packages(&python, &[KERNEL_PACKAGE])
            .await?;
        self.registrar
            .register(&python, &config.kernel_name, &config.display_name)
            .await?;
        println!(
            "{} Kernel registered as {}",
            "✓".green().bold(),
            config.display_name.yellow()
        );

        self.print_summary(config, &venv);

        Ok(())
    }

    fn print_summary(&self, config: &ProvisionConfig, venv: &VenvPaths) {
        let freeze_hint = format!(
            "{} -m pip freeze | grep -E '{}' > {}",
            venv.python().display(),
            FREEZE_FILTER,
            config.requirements.display()
        );

        println!();
        println!(
            "{} Environment provisioned successfully!",
            "✓".green().bold()
        );
        println!();
        println!("Next steps:");
        println!(
            "  1. Activate the environment: {}",
            format!("source {}", venv.activate_script().display()).cyan()
        );
        println!(
            "  2. Open a notebook and pick the {} kernel",
            config.display_name.yellow()
        );
        println!("  3. Pin installed versions: {}", freeze_hint.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProvisionError;
    use crate::provision::config::{DEFAULT_DISPLAY_NAME, DEFAULT_KERNEL_NAME};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CallLog(Arc<Mutex<Vec<String>>>);

    impl CallLog {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeEnvTool {
        log: CallLog,
    }

    #[async_trait]
    impl EnvironmentTool for FakeEnvTool {
        async fn create_env(&self, interpreter: &Path, env_dir: &Path) -> Result<()> {
            self.log.push(format!(
                "create-env {} {}",
                interpreter.display(),
                env_dir.display()
            ));
            Ok(())
        }
    }

    struct FakeInstaller {
        log: CallLog,
        fail_upgrade_with: Option<i32>,
    }

    #[async_trait]
    impl PackageInstaller for FakeInstaller {
        async fn upgrade_tooling(&self, _python: &Path) -> Result<()> {
            self.log.push("upgrade-tooling".to_string());
            match self.fail_upgrade_with {
                Some(status) => Err(ProvisionError::StepFailed {
                    step: "packaging tooling upgrade",
                    status,
                }),
                None => Ok(()),
            }
        }

        async fn install_manifest(&self, _python: &Path, manifest: &Path) -> Result<()> {
            self.log.push(format!("install-manifest {}", manifest.display()));
            Ok(())
        }

        async fn install_packages(&self, _python: &Path, packages: &[&str]) -> Result<()> {
            self.log.push(format!("install-packages {}", packages.join(" ")));
            Ok(())
        }
    }

    struct FakeRegistrar {
        log: CallLog,
    }

    #[async_trait]
    impl KernelRegistrar for FakeRegistrar {
        async fn register(&self, _python: &Path, name: &str, display_name: &str) -> Result<()> {
            self.log.push(format!("register {} {}", name, display_name));
            Ok(())
        }
    }

    fn provisioner(
        log: &CallLog,
        fail_upgrade_with: Option<i32>,
    ) -> Provisioner<FakeEnvTool, FakeInstaller, FakeRegistrar> {
        Provisioner::new(
            FakeEnvTool { log: log.clone() },
            FakeInstaller {
                log: log.clone(),
                fail_upgrade_with,
            },
            FakeRegistrar { log: log.clone() },
        )
    }

    fn config_in(dir: &Path) -> ProvisionConfig {
        ProvisionConfig {
            venv_dir: dir.join(".venv"),
            requirements: dir.join("requirements.txt"),
            kernel_name: DEFAULT_KERNEL_NAME.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            python_override: None,
        }
    }

    #[tokio::test]
    async fn fresh_directory_runs_every_step_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = CallLog::default();
        let config = config_in(dir.path());

        provisioner(&log, None)
            .provision(&config, Path::new("/usr/bin/python3"))
            .await
            .unwrap();

        let entries = log.entries();
        assert_eq!(
            entries,
            vec![
                format!("create-env /usr/bin/python3 {}", config.venv_dir.display()),
                "upgrade-tooling".to_string(),
                format!("install-packages {}", FALLBACK_PACKAGES.join(" ")),
                format!("install-packages {}", KERNEL_PACKAGE),
                format!("register {} {}", DEFAULT_KERNEL_NAME, DEFAULT_DISPLAY_NAME),
            ]
        );
    }

    #[tokio::test]
    async fn existing_environment_is_not_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(&config.venv_dir).unwrap();

        let log = CallLog::default();
        provisioner(&log, None)
            .provision(&config, Path::new("/usr/bin/python3"))
            .await
            .unwrap();

        let entries = log.entries();
        assert!(entries.iter().all(|e| !e.starts_with("create-env")));
        assert_eq!(entries[0], "upgrade-tooling");
    }

    #[tokio::test]
    async fn manifest_wins_over_fallback_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.requirements, "numpy==2.1.0\n").unwrap();

        let log = CallLog::default();
        provisioner(&log, None)
            .provision(&config, Path::new("/usr/bin/python3"))
            .await
            .unwrap();

        let entries = log.entries();
        assert!(entries.contains(&format!(
            "install-manifest {}",
            config.requirements.display()
        )));
        assert!(!entries.contains(&format!(
            "install-packages {}",
            FALLBACK_PACKAGES.join(" ")
        )));
    }

    #[tokio::test]
    async fn failed_step_aborts_the_remainder() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let log = CallLog::default();
        let err = provisioner(&log, Some(9))
            .provision(&config, Path::new("/usr/bin/python3"))
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 9);

        let entries = log.entries();
        assert_eq!(entries.last().map(String::as_str), Some("upgrade-tooling"));
        assert!(entries.iter().all(|e| !e.starts_with("register")));
    }
}
