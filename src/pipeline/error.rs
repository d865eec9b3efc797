use std::io;
use std::path::PathBuf;

use crate::sink::Stage;

/// A setup step the run cannot continue without
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to create {project} project: {output}")]
    Scaffold { project: Stage, output: String },

    #[error("failed to install required package {package}: {output}")]
    RequiredPackage { package: String, output: String },

    #[error("failed to write {}: {source}", path.display())]
    WriteSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to reference the implementation from {project}: {output}")]
    Reference { project: Stage, output: String },

    #[error("failed to create solution: {output}")]
    Solution { output: String },
}

impl SetupError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SetupError::WriteSource {
            path: path.into(),
            source,
        }
    }

    /// Raw toolchain text where there is some, else the error message
    pub fn diagnostic(&self) -> String {
        match self {
            SetupError::Scaffold { output, .. }
            | SetupError::RequiredPackage { output, .. }
            | SetupError::Reference { output, .. }
            | SetupError::Solution { output } => output.clone(),
            SetupError::WriteSource { .. } => self.to_string(),
        }
    }
}

/// Failure of the validation call itself.
///
/// Stage failures end up in the report; this is only returned when the run
/// could not start.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("failed to create working directory: {source}")]
    Workspace {
        #[source]
        source: io::Error,
    },
}
