//! External process execution
//!
//! Every toolchain and analysis-tool call in the pipeline goes through the
//! [`CommandRunner`] seam defined here. The production implementation,
//! [`SystemRunner`], spawns the program directly (no shell), drains its pipes
//! on background threads and enforces the invocation's timeout.
//!
//! # Timeout Behavior
//!
//! When a command exceeds its timeout:
//! - The process (and on Unix its whole process group) is killed
//! - The returned [`ProcessOutput`] has `timed_out` set and `success` cleared
//! - Whatever output was produced before the kill is kept
//!
//! Only a failure to launch or wait on the process is an `Err`. A non-zero
//! exit code or a timeout is a normal [`ProcessOutput`] that callers interpret.

mod executor;
mod invocation;
mod output;

#[cfg(test)]
pub(crate) mod scripted;

use std::io;

pub use executor::SystemRunner;
pub use invocation::{Invocation, DEFAULT_TIMEOUT};
pub use output::ProcessOutput;

/// Errors raised when a process cannot be launched or awaited
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Executes an [`Invocation`] and reports how it ended.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        (**self).run(invocation)
    }
}
