//! Validator configuration
//!
//! Loaded from TOML. Every field has a default, so a missing or partial file
//! is fine. Lookup order:
//!
//! 1. `--config <path>` (must exist)
//! 2. `./gencheck.toml`
//! 3. `<config dir>/gencheck/config.toml`
//! 4. built-in defaults
//!
//! `GENCHECK_ANALYSIS_TOOL`, `GENCHECK_TOOLCHAIN` and
//! `GENCHECK_RETAIN_ON_FAILURE` override the file afterwards.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LOCAL_CONFIG_FILE: &str = "gencheck.toml";

pub const ENV_ANALYSIS_TOOL: &str = "GENCHECK_ANALYSIS_TOOL";
pub const ENV_TOOLCHAIN: &str = "GENCHECK_TOOLCHAIN";
pub const ENV_RETAIN_ON_FAILURE: &str = "GENCHECK_RETAIN_ON_FAILURE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub toolchain: ToolchainConfig,
    pub analysis: AnalysisConfig,
    pub timeouts: Timeouts,
    pub assistant: AssistantConfig,
    pub retention: RetentionConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub program: String,
    pub target_framework: String,
    pub required_packages: Vec<String>,
    pub test_packages: Vec<String>,
    pub ground_truth_test_packages: Vec<String>,
    pub build_args: Vec<String>,
    pub test_args: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: "dotnet".to_string(),
            target_framework: "net8.0".to_string(),
            required_packages: strings(&["OutSystems.ExternalLibraries.SDK", "CustomCode.Analyzer"]),
            test_packages: strings(&[
                "xunit",
                "xunit.runner.visualstudio",
                "Microsoft.NET.Test.Sdk",
                "Moq",
            ]),
            ground_truth_test_packages: strings(&[
                "xunit",
                "xunit.runner.visualstudio",
                "Microsoft.NET.Test.Sdk",
            ]),
            build_args: strings(&["build", "--nologo", "-nowarn:CS9057"]),
            test_args: strings(&["test", "--no-build", "--nologo"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub program: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            program: "CCAGTestGenerator.Core".to_string(),
        }
    }
}

/// Per-call bounds, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub scaffold: u64,
    pub scaffold_retry: u64,
    pub scaffold_backoff: u64,
    pub package: u64,
    pub reference: u64,
    pub solution: u64,
    pub analysis: u64,
    pub build: u64,
    pub test: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            scaffold: 30,
            scaffold_retry: 40,
            scaffold_backoff: 2,
            package: 120,
            reference: 60,
            solution: 60,
            analysis: 30,
            build: 300,
            test: 480,
        }
    }
}

impl Timeouts {
    pub fn scaffold(&self) -> Duration {
        Duration::from_secs(self.scaffold)
    }

    pub fn scaffold_retry(&self) -> Duration {
        Duration::from_secs(self.scaffold_retry)
    }

    pub fn scaffold_backoff(&self) -> Duration {
        Duration::from_secs(self.scaffold_backoff)
    }

    pub fn package(&self) -> Duration {
        Duration::from_secs(self.package)
    }

    pub fn reference(&self) -> Duration {
        Duration::from_secs(self.reference)
    }

    pub fn solution(&self) -> Duration {
        Duration::from_secs(self.solution)
    }

    pub fn analysis(&self) -> Duration {
        Duration::from_secs(self.analysis)
    }

    pub fn build(&self) -> Duration {
        Duration::from_secs(self.build)
    }

    pub fn test(&self) -> Duration {
        Duration::from_secs(self.test)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Seconds
    pub request_timeout: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout: 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub retain_on_failure: bool,
    /// Where retained solutions are copied
    pub target_dir: Option<PathBuf>,
    /// Parent of the per-run scratch directories, system temp dir if unset
    pub work_root: Option<PathBuf>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `true`, `1`, `yes` or `y`, in any case
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

impl ValidatorConfig {
    /// Load following the lookup order, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::locate(explicit)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Ok(Some(local));
        }

        Ok(dirs::config_dir()
            .map(|dir| dir.join("gencheck").join("config.toml"))
            .filter(|path| path.is_file()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(dir) = path.parent() {
            config.analysis.program = resolve_program(&config.analysis.program, dir);
        }
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(program) = lookup(ENV_ANALYSIS_TOOL).filter(|v| !v.trim().is_empty()) {
            self.analysis.program = program;
        }
        if let Some(program) = lookup(ENV_TOOLCHAIN).filter(|v| !v.trim().is_empty()) {
            self.toolchain.program = program;
        }
        if let Some(flag) = lookup(ENV_RETAIN_ON_FAILURE) {
            self.retention.retain_on_failure = parse_flag(&flag);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.toolchain.program.trim().is_empty() {
            bail!("toolchain.program must not be empty");
        }
        if self.analysis.program.trim().is_empty() {
            bail!("analysis.program must not be empty");
        }
        if self.toolchain.target_framework.trim().is_empty() {
            bail!("toolchain.target_framework must not be empty");
        }

        let t = &self.timeouts;
        for (name, secs) in [
            ("scaffold", t.scaffold),
            ("scaffold_retry", t.scaffold_retry),
            ("package", t.package),
            ("reference", t.reference),
            ("solution", t.solution),
            ("analysis", t.analysis),
            ("build", t.build),
            ("test", t.test),
        ] {
            if secs == 0 {
                bail!("timeouts.{name} must be greater than zero");
            }
        }
        if t.test <= t.build {
            bail!(
                "timeouts.test ({}s) must be longer than timeouts.build ({}s)",
                t.test,
                t.build
            );
        }
        Ok(())
    }
}

/// Relative paths with a separator are taken relative to the config file.
/// Bare names are left for `PATH` lookup.
fn resolve_program(program: &str, config_dir: &Path) -> String {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        config_dir.join(path).display().to_string()
    } else {
        program.to_string()
    }
}
