//! On-disk shape of a validation solution
//!
//! ```text
//! <Class>/                      solution root
//! ├── <Class>.sln
//! ├── <Class>/                  implementation library
//! │   ├── <Class>.csproj
//! │   └── <Class>.cs
//! ├── LLMGeneratedTests/
//! │   ├── LLMGeneratedTests.csproj
//! │   └── <Class>Tests.cs
//! └── GroundTruthTests/         only with ground truth
//!     ├── GroundTruthTests.csproj
//!     └── <Class>Tests.cs       written by the analysis tool
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const LLM_TESTS_PROJECT: &str = "LLMGeneratedTests";
pub const GROUND_TRUTH_PROJECT: &str = "GroundTruthTests";

/// Directories excluded from tree listings
const LISTING_EXCLUDED_DIRS: &[&str] = &["obj"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionLayout {
    root: PathBuf,
    class_name: String,
}

impl SolutionLayout {
    pub fn new(root: impl Into<PathBuf>, class_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            class_name: class_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn implementation_dir(&self) -> PathBuf {
        self.root.join(&self.class_name)
    }

    pub fn implementation_project(&self) -> PathBuf {
        self.implementation_dir()
            .join(format!("{}.csproj", self.class_name))
    }

    pub fn implementation_file(&self) -> PathBuf {
        self.implementation_dir().join(format!("{}.cs", self.class_name))
    }

    pub fn llm_tests_dir(&self) -> PathBuf {
        self.root.join(LLM_TESTS_PROJECT)
    }

    pub fn llm_tests_project(&self) -> PathBuf {
        self.llm_tests_dir()
            .join(format!("{LLM_TESTS_PROJECT}.csproj"))
    }

    pub fn llm_tests_file(&self) -> PathBuf {
        self.llm_tests_dir().join(self.tests_file_name())
    }

    pub fn ground_truth_dir(&self) -> PathBuf {
        self.root.join(GROUND_TRUTH_PROJECT)
    }

    pub fn ground_truth_project(&self) -> PathBuf {
        self.ground_truth_dir()
            .join(format!("{GROUND_TRUTH_PROJECT}.csproj"))
    }

    pub fn ground_truth_tests_file(&self) -> PathBuf {
        self.ground_truth_dir().join(self.tests_file_name())
    }

    fn tests_file_name(&self) -> String {
        format!("{}Tests.cs", self.class_name)
    }
}

/// Tree listing of `dir`, directories first, skipping `obj`.
pub fn render_tree(dir: &Path) -> io::Result<String> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let mut out = format!("{name}/\n");
    render_children(dir, "", &mut out)?;
    Ok(out)
}

fn render_children(dir: &Path, prefix: &str, out: &mut String) -> io::Result<()> {
    let mut entries: Vec<(bool, String, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let is_dir = path.is_dir();
            (is_dir, entry.file_name().to_string_lossy().into_owned(), path)
        })
        .filter(|(is_dir, name, _)| !(*is_dir && LISTING_EXCLUDED_DIRS.contains(&name.as_str())))
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let count = entries.len();
    for (i, (is_dir, name, path)) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        if is_dir {
            out.push_str(&format!("{prefix}{branch}{name}/\n"));
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_children(&path, &child_prefix, out)?;
        } else {
            out.push_str(&format!("{prefix}{branch}{name}\n"));
        }
    }
    Ok(())
}
