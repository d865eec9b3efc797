//! Captured result of a finished (or killed) process

use std::time::Duration;

/// Outcome of running an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
    /// Whether the command was terminated due to timeout
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn new(
        command: impl Into<String>,
        success: bool,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
        duration: Duration,
        timed_out: bool,
    ) -> Self {
        Self {
            command: command.into(),
            success,
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            duration,
            timed_out,
        }
    }

    /// stdout followed by stderr, the text the output parsers consume
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// The most useful text to show when the command failed.
    ///
    /// Prefers stderr; falls back to stdout when stderr is empty, since the
    /// toolchain reports many errors (package resolution, templates) on stdout.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.exit_code {
            Some(code) => format!("`{}` exited with code {code}", self.command),
            None if self.timed_out => format!("`{}` timed out", self.command),
            None => format!("`{}` was terminated by a signal", self.command),
        }
    }

    /// One-line status summary
    pub fn summary(&self) -> String {
        let status = if self.timed_out {
            "TIMEOUT"
        } else if self.success {
            "OK"
        } else {
            "FAILED"
        };
        format!(
            "{} - {} ({}ms, exit code: {:?})",
            status,
            self.command,
            self.duration.as_millis(),
            self.exit_code
        )
    }
}
