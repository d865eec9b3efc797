//! What happens to a solution tree after the run

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::RetentionConfig;

/// Build output directories never copied out of the scratch tree
const EXCLUDED_DIRS: &[&str] = &["bin", "obj"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Retained trees are copied to `<target_dir>/<Class>`
    pub target_dir: Option<PathBuf>,
    /// Keep the tree of a failed build as well
    pub retain_on_failure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionDecision {
    Discard,
    /// Leave the scratch tree in place and report its path
    KeepInPlace,
    CopyTo(PathBuf),
}

impl RetentionPolicy {
    pub fn new(target_dir: Option<PathBuf>, retain_on_failure: bool) -> Self {
        Self {
            target_dir,
            retain_on_failure,
        }
    }

    pub fn from_config(config: &RetentionConfig) -> Self {
        Self::new(config.target_dir.clone(), config.retain_on_failure)
    }

    /// Decide for a run whose build ran, given whether it succeeded
    pub fn decide(&self, build_succeeded: bool, class_name: &str) -> RetentionDecision {
        if !build_succeeded && !self.retain_on_failure {
            return RetentionDecision::Discard;
        }
        match &self.target_dir {
            Some(target) => RetentionDecision::CopyTo(target.join(class_name)),
            None => RetentionDecision::KeepInPlace,
        }
    }
}

/// Copy `src` to `dest`, replacing anything already at `dest` and skipping
/// `bin` and `obj` directories at any depth.
///
/// The copy is staged next to `dest` and only moved into place once complete,
/// so a failed copy leaves any previous tree untouched.
pub fn replace_tree(src: &Path, dest: &Path) -> io::Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(".gencheck-copy-")
        .tempdir_in(parent)?;
    let staged = staging.path().join("tree");
    copy_dir(src, &staged)?;

    if dest.exists() {
        tracing::info!("Removing existing solution at {}", dest.display());
        fs::remove_dir_all(dest)?;
    }
    fs::rename(&staged, dest)
}

fn copy_dir(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let target = dest.join(entry.file_name());

        if path.is_dir() {
            let name = entry.file_name();
            if EXCLUDED_DIRS.iter().any(|excluded| name == *excluded) {
                continue;
            }
            copy_dir(&path, &target)?;
        } else {
            fs::copy(&path, &target)?;
        }
    }
    Ok(())
}
