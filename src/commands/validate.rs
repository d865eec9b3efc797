//! Run one validation from the command line

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assistant::HttpAssistant;
use crate::config::ValidatorConfig;
use crate::models::{TestResult, ValidationInput, ValidationReport};
use crate::pipeline::{RetentionPolicy, Validator};
use crate::process::SystemRunner;
use crate::sink::TracingReporter;

/// The code generator's output object
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedBundle {
    pub implementation_code: String,
    pub unit_test_code: String,
    #[serde(default)]
    pub nuget_packages: Option<String>,
}

impl GeneratedBundle {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bundle: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse bundle: {}", path.display()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    pub implementation: Option<PathBuf>,
    pub tests: Option<PathBuf>,
    pub packages: Option<String>,
    pub bundle: Option<PathBuf>,
    pub ground_truth: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub retain_on_failure: bool,
    pub json: bool,
}

/// Execute the validate command. Returns whether the run succeeded.
pub fn execute(config: &ValidatorConfig, args: ValidateArgs) -> Result<bool> {
    config.validate()?;

    let mut input = build_input(&args)?;

    if let Some(ground_truth) = &args.ground_truth {
        if !ground_truth.is_file() {
            bail!("Ground truth file not found: {}", ground_truth.display());
        }
        input = input.with_ground_truth(ground_truth);
        match HttpAssistant::from_config(&config.assistant) {
            Ok(assistant) => {
                tracing::debug!(model = assistant.model(), "Correlation assistant configured");
                input = input.with_assistant(Arc::new(assistant));
            }
            Err(e) => tracing::warn!("Correlation assistant unavailable: {e}"),
        }
    }

    let retention = retention_policy(config, &args);
    let reporter = TracingReporter;
    let report = Validator::new(config, &SystemRunner, &reporter)
        .validate(&input, &retention)
        .context("Validation could not start")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }

    Ok(report.is_success())
}

fn build_input(args: &ValidateArgs) -> Result<ValidationInput> {
    if let Some(bundle_path) = &args.bundle {
        if args.implementation.is_some() || args.tests.is_some() {
            bail!("--bundle cannot be combined with --implementation or --tests");
        }
        let bundle = GeneratedBundle::load(bundle_path)?;
        let packages = args
            .packages
            .clone()
            .or(bundle.nuget_packages)
            .unwrap_or_default();
        return Ok(
            ValidationInput::new(bundle.implementation_code, bundle.unit_test_code)
                .with_packages(packages),
        );
    }

    let (Some(implementation), Some(tests)) = (&args.implementation, &args.tests) else {
        bail!("Either --bundle or both --implementation and --tests are required");
    };
    let implementation_code = fs::read_to_string(implementation)
        .with_context(|| format!("Failed to read implementation: {}", implementation.display()))?;
    let unit_test_code = fs::read_to_string(tests)
        .with_context(|| format!("Failed to read tests: {}", tests.display()))?;

    Ok(ValidationInput::new(implementation_code, unit_test_code)
        .with_packages(args.packages.clone().unwrap_or_default()))
}

/// Command-line flags win over the configured retention
fn retention_policy(config: &ValidatorConfig, args: &ValidateArgs) -> RetentionPolicy {
    let mut policy = RetentionPolicy::from_config(&config.retention);
    if let Some(target) = &args.target_dir {
        policy.target_dir = Some(target.clone());
    }
    policy.retain_on_failure |= args.retain_on_failure;
    policy
}

fn print_report(report: &ValidationReport) {
    println!("\n{}", "Validation Summary:".bold());
    println!(
        "  {} {} {}",
        "Outcome:".dimmed(),
        report.outcome,
        format!("({})", elapsed_label(report)).dimmed()
    );

    let build = &report.build_metrics;
    if build.attempted() {
        let status = if build.success {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!(
            "  {} Build ({} warning(s), {} error(s), {} ms)",
            status,
            build.warnings.len(),
            build.errors.len(),
            build.duration_ms
        );
        for error in build.errors.iter().take(10) {
            println!("    {} {}", "→".red(), error);
        }
    } else {
        println!("  {} Build not attempted", "−".dimmed());
    }

    if let Some(info) = &report.action_map_info {
        let status = if info.matches {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} Action map: implementation {} vs ground truth {}",
            status, info.implementation, info.ground_truth
        );
    }

    if let Some(tests) = &report.llm_test_results {
        print_tests("Generated tests", tests);
    }
    if let Some(tests) = &report.ground_truth_test_results {
        print_tests("Ground truth tests", tests);
    }

    if !report.failed_packages.is_empty() {
        println!(
            "  {} Packages not installed: {}",
            "!".yellow().bold(),
            report.failed_packages.join(", ")
        );
    }

    if !report.is_success() && !report.analysis_output.trim().is_empty() {
        println!("\n{}", "Diagnostics:".bold());
        for line in report.analysis_output.lines().take(20) {
            println!("  {}", line.dimmed());
        }
    }

    if let Some(dir) = &report.solution_dir {
        println!("\n{} Solution kept at {}", "→".cyan().bold(), dir.display());
    }

    println!();
    if report.is_success() {
        println!("{} Validation passed", "✓".green().bold());
    } else {
        println!("{} Validation failed", "✗".red().bold());
    }
}

/// Wall-clock time of the run, e.g. `4.2s`
fn elapsed_label(report: &ValidationReport) -> String {
    let ms = report.duration().num_milliseconds().max(0);
    format!("{:.1}s", ms as f64 / 1000.0)
}

fn print_tests(label: &str, tests: &TestResult) {
    let status = if tests.all_passed() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!(
        "  {} {}: {} passed, {} failed, {} skipped ({} ms)",
        status, label, tests.passed, tests.failed, tests.skipped, tests.duration_ms
    );
    if let Some(details) = &tests.error_details {
        for detail in details.iter().take(5) {
            println!("    {} {}", "→".yellow(), detail);
        }
    }
}
