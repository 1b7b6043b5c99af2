//! Analysis container: one R script, its parameters, and the run pipeline.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};
use crate::execution::Runtime;
use crate::fields::Series;
use crate::introspect::extract_parameters;
use crate::marshal::{to_runtime_vector, RVector};
use crate::normalize::{normalize, ResultTable};

/// Parameter name to bound values.
pub type Inputs = HashMap<String, Series>;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisContainer {
    path: PathBuf,
    name: String,
    entry: String,
    parameters: Vec<String>,
}

impl AnalysisContainer {
    /// Introspect the script at `path` for the parameters of `entry`.
    pub fn new(path: impl AsRef<Path>, entry: &str) -> AnalysisResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AnalysisError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let source = fs::read_to_string(path).map_err(|e| AnalysisError::Parse {
            path: path.to_path_buf(),
            entry: entry.to_string(),
            reason: format!("unreadable script: {e}"),
        })?;
        let parameters =
            extract_parameters(&source, entry).map_err(|e| AnalysisError::Parse {
                path: path.to_path_buf(),
                entry: entry.to_string(),
                reason: e.to_string(),
            })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(analysis = %name, ?parameters, "introspected script");

        Ok(Self {
            path: path.to_path_buf(),
            name,
            entry: entry.to_string(),
            parameters,
        })
    }

    /// Human-readable name: the script's file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Parameter names in declared positional order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// The input keys must equal the parameter set; order does not matter.
    pub fn validate(&self, inputs: &Inputs) -> AnalysisResult<()> {
        let expected: BTreeSet<&str> = self.parameters.iter().map(String::as_str).collect();
        let received: BTreeSet<&str> = inputs.keys().map(String::as_str).collect();
        if expected == received {
            return Ok(());
        }
        Err(AnalysisError::Validation {
            expected: self.parameters.clone(),
            received: received.into_iter().map(str::to_string).collect(),
        })
    }

    /// Marshal the inputs in declared parameter order.
    pub fn marshal(&self, inputs: &Inputs) -> AnalysisResult<Vec<RVector>> {
        self.validate(inputs)?;
        self.parameters
            .iter()
            .map(|p| match inputs.get(p) {
                Some(series) => to_runtime_vector(p, series),
                None => Err(AnalysisError::Validation {
                    expected: self.parameters.clone(),
                    received: inputs.keys().cloned().collect(),
                }),
            })
            .collect()
    }

    /// Validate, marshal, execute and normalize. No partial results.
    pub async fn run<R: Runtime>(&self, runtime: &R, inputs: &Inputs) -> AnalysisResult<ResultTable> {
        let args = self.marshal(inputs)?;
        info!(analysis = %self.name, entry = %self.entry, "running analysis");
        let raw = runtime.invoke(&self.path, &self.entry, &args).await?;
        let table = normalize(&raw);
        debug!(analysis = %self.name, sections = table.len(), "analysis finished");
        Ok(table)
    }
}
