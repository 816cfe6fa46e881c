pub mod error;
pub mod process;

pub use error::{ProvisionError, Result};
pub use process::ProcessExecutor;
