use crate::core::error::Result;
use crate::provision::config::{
    ProvisionConfig, DEFAULT_DISPLAY_NAME, DEFAULT_KERNEL_NAME, DEFAULT_REQUIREMENTS,
    DEFAULT_VENV_DIR,
};
use crate::provision::toolchain::{IpykernelCli, PipCli, VenvCli};
use crate::provision::Provisioner;
use crate::python::resolve_interpreter;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "venv-bootstrap",
    version,
    about = "Provision a local Python virtual environment and register a notebook kernel",
    long_about = None
)]
pub struct Cli {
    /// Virtual environment directory
    #[arg(short = 'v', long = "venv", value_name = "PATH", default_value = DEFAULT_VENV_DIR)]
    pub venv: PathBuf,

    /// Requirements manifest to install (a fixed fallback set is used when absent)
    #[arg(
        short = 'r',
        long = "requirements",
        value_name = "PATH",
        default_value = DEFAULT_REQUIREMENTS
    )]
    pub requirements: PathBuf,

    /// Kernel name registered with the notebook front-end
    #[arg(
        short = 'n',
        long = "kernel-name",
        value_name = "NAME",
        default_value = DEFAULT_KERNEL_NAME
    )]
    pub kernel_name: String,

    /// Kernel display name shown in notebook UIs
    #[arg(
        short = 'd',
        long = "display-name",
        value_name = "LABEL",
        default_value = DEFAULT_DISPLAY_NAME
    )]
    pub display_name: String,

    /// Python interpreter used to create the environment (default: python3 or python from PATH)
    #[arg(long = "python", value_name = "PATH")]
    pub python: Option<PathBuf>,
}

impl From<Cli> for ProvisionConfig {
    fn from(cli: Cli) -> Self {
        Self {
            venv_dir: cli.venv,
            requirements: cli.requirements,
            kernel_name: cli.kernel_name,
            display_name: cli.display_name,
            python_override: cli.python,
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = ProvisionConfig::from(cli);
    config.validate()?;

    // Resolution happens before the provisioner exists, so a bad override
    // or an empty PATH cannot leave partial side effects behind.
    let interpreter = resolve_interpreter(config.python_override.as_deref())?;

    let provisioner = Provisioner::new(VenvCli, PipCli, IpykernelCli);
    provisioner.provision(&config, &interpreter).await
}
