pub mod check;
pub mod config;
pub mod error;
pub mod runner;

pub use check::{
    COUNT_MISMATCH_STATUS, Checker, ExecutionResult, FAULT_STATUS, Outcome, RunSummary,
    TIMEOUT_STATUS, check,
};
pub use config::CheckConfig;
pub use error::{Error, Result};
pub use runner::{GoToolchain, Runner, Toolchain, run_example};
