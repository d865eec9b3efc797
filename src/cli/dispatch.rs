use anyhow::Result;
use gencheck::commands::{doctor, map, validate};
use gencheck::config::ValidatorConfig;

use super::types::{Cli, Commands};

/// Run the selected command. `Ok(false)` means it ran but did not pass.
pub fn dispatch(cli: Cli) -> Result<bool> {
    let config = ValidatorConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            implementation,
            tests,
            packages,
            bundle,
            ground_truth,
            target_dir,
            retain_on_failure,
            json,
        } => validate::execute(
            &config,
            validate::ValidateArgs {
                implementation,
                tests,
                packages,
                bundle,
                ground_truth,
                target_dir,
                retain_on_failure,
                json,
            },
        ),
        Commands::Doctor => doctor::execute(&config),
        Commands::Map { ground_truth } => map::execute(&ground_truth).map(|()| true),
    }
}
