//! Print the action map derived from a ground-truth file

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::ground_truth::GroundTruth;

pub fn execute(path: &Path) -> Result<()> {
    let ground_truth = GroundTruth::load(path)
        .with_context(|| format!("Failed to load ground truth: {}", path.display()))?;

    println!("{}", ground_truth.summary());

    if let Some(description) = &ground_truth.description {
        println!("{}", description.dimmed());
    }
    for action in &ground_truth.actions {
        println!(
            "  {} {}({})",
            "→".cyan(),
            action.name.bold(),
            action.params.join(", ")
        );
    }
    Ok(())
}
