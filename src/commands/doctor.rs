//! Check that the external programs and the configuration are usable

use anyhow::Result;
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};

use crate::config::ValidatorConfig;

/// Outcome of one environment check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub detail: String,
    /// Failing this check does not fail the command
    pub advisory: bool,
}

impl Check {
    fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            detail: detail.into(),
            advisory: false,
        }
    }

    fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            detail: detail.into(),
            advisory: false,
        }
    }

    fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }
}

/// Execute the doctor command. Returns whether every required check passed.
pub fn execute(config: &ValidatorConfig) -> Result<bool> {
    if let Some(source) = &config.source {
        println!(
            "{} Using config {}\n",
            "→".cyan().bold(),
            source.display()
        );
    }

    let checks = run_checks(config);
    for check in &checks {
        let status = match (check.passed, check.advisory) {
            (true, _) => "✓".green(),
            (false, true) => "!".yellow(),
            (false, false) => "✗".red(),
        };
        println!("  {} {} {}", status, check.name.bold(), check.detail.dimmed());
    }

    let healthy = checks.iter().all(|c| c.passed || c.advisory);
    println!();
    if healthy {
        println!("{} Environment ready", "✓".green().bold());
    } else {
        println!("{} Environment has problems", "✗".red().bold());
    }
    Ok(healthy)
}

pub fn run_checks(config: &ValidatorConfig) -> Vec<Check> {
    let mut checks = vec![
        program_check("toolchain", &config.toolchain.program),
        program_check("analysis tool", &config.analysis.program),
    ];

    checks.push(match config.validate() {
        Ok(()) => Check::pass("configuration", "valid"),
        Err(e) => Check::fail("configuration", format!("{e:#}")),
    });

    let key_var = &config.assistant.api_key_env;
    let key_set = env::var(key_var).is_ok_and(|v| !v.trim().is_empty());
    checks.push(if key_set {
        Check::pass("assistant key", format!("{key_var} is set"))
    } else {
        Check::fail(
            "assistant key",
            format!("{key_var} is not set, multi-parameter ground truth cannot be correlated"),
        )
        .advisory()
    });

    checks
}

fn program_check(name: &str, program: &str) -> Check {
    match resolve(program) {
        Some(path) => Check::pass(name, path.display().to_string()),
        None => Check::fail(name, format!("'{program}' not found")),
    }
}

/// Paths are checked directly, bare names are looked up on PATH
fn resolve(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    which::which(program).ok()
}
