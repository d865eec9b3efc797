use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gencheck")]
#[command(about = "Build and test generated C# code against ground truth", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to ./gencheck.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold, build and test generated code
    Validate {
        /// C# file with the implementation
        #[arg(long, conflicts_with = "bundle", requires = "tests")]
        implementation: Option<PathBuf>,

        /// C# file with the generated unit tests
        #[arg(long, conflicts_with = "bundle", requires = "implementation")]
        tests: Option<PathBuf>,

        /// Comma-separated NuGet packages the implementation needs
        #[arg(long)]
        packages: Option<String>,

        /// JSON file with implementation_code, unit_test_code and nuget_packages
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Ground truth YAML to check the action map against
        #[arg(long)]
        ground_truth: Option<PathBuf>,

        /// Copy retained solutions to <DIR>/<Class>
        #[arg(long, value_name = "DIR")]
        target_dir: Option<PathBuf>,

        /// Keep the solution when the build fails
        #[arg(long)]
        retain_on_failure: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the toolchain, analysis tool and config are usable
    Doctor,

    /// Print the action map derived from a ground truth file
    Map {
        /// Path to the ground truth YAML
        ground_truth: PathBuf,
    },
}
