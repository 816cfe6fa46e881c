use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Python interpreter error: {0}")]
    Interpreter(String),

    #[error("{step} failed with exit status {status}")]
    StepFailed { step: &'static str, status: i32 },

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProvisionError {
    /// Process exit code for this error. A failed external tool propagates
    /// its own status; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvisionError::StepFailed { status, .. } => *status,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
