//! Directory scan producing one [`AnalysisContainer`] per script.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::analysis::AnalysisContainer;
use crate::error::AnalysisError;

/// A script that matched the extension but could not be introspected.
#[derive(Debug)]
pub struct Rejected {
    pub path: PathBuf,
    pub error: AnalysisError,
}

#[derive(Debug, Default)]
pub struct Catalog {
    directory: PathBuf,
    analyses: Vec<AnalysisContainer>,
    rejected: Vec<Rejected>,
}

impl Catalog {
    /// Scan `directory` for `*.<extension>` scripts, sorted by file name.
    ///
    /// A directory that does not exist yields an empty catalog. The match on
    /// the extension is case-sensitive.
    pub fn scan(directory: &Path, entry: &str, extension: &str) -> io::Result<Self> {
        let mut catalog = Catalog {
            directory: directory.to_path_buf(),
            ..Default::default()
        };
        if !directory.is_dir() {
            info!(directory = %directory.display(), "analysis directory missing, catalog cleared");
            return Ok(catalog);
        }

        let suffix = format!(".{extension}");
        let mut scripts: Vec<PathBuf> = fs::read_dir(directory)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(&suffix) && n.len() > suffix.len())
            })
            .collect();
        scripts.sort();

        for path in scripts {
            match AnalysisContainer::new(&path, entry) {
                Ok(container) => catalog.analyses.push(container),
                Err(error) => {
                    warn!(script = %path.display(), %error, "skipping script");
                    catalog.rejected.push(Rejected { path, error });
                }
            }
        }
        info!(
            directory = %directory.display(),
            analyses = catalog.analyses.len(),
            rejected = catalog.rejected.len(),
            "scanned analysis directory"
        );
        Ok(catalog)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn analyses(&self) -> &[AnalysisContainer] {
        &self.analyses
    }

    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    pub fn get(&self, name: &str) -> Option<&AnalysisContainer> {
        self.analyses.iter().find(|a| a.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.analyses.iter().map(|a| a.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}
