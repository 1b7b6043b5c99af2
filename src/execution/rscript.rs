//! `Rscript` runtime: one fresh R process per invocation.

use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::RuntimeFailure;
use crate::marshal::RVector;
use crate::process;

use super::protocol::{self, Outcome};
use super::{driver, RawResult, Runtime};

#[derive(Debug, Clone)]
pub struct Rscript {
    program: String,
    timeout: Option<Duration>,
}

impl Rscript {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.rscript_path()).with_timeout(cfg.execution_timeout())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Runtime for Rscript {
    async fn invoke(
        &self,
        script: &Path,
        entry: &str,
        args: &[RVector],
    ) -> Result<Vec<RawResult>, RuntimeFailure> {
        let source = fs::read_to_string(script).map_err(|source| RuntimeFailure::Read {
            path: script.to_path_buf(),
            source,
        })?;

        let program = driver::render(&source, entry, args);
        let mut staged = tempfile::Builder::new()
            .prefix("ranalysis-")
            .suffix(".R")
            .tempfile()
            .map_err(RuntimeFailure::Stage)?;
        staged
            .write_all(program.as_bytes())
            .and_then(|_| staged.flush())
            .map_err(RuntimeFailure::Stage)?;

        debug!(
            script = %script.display(),
            entry,
            args = args.len(),
            driver = %staged.path().display(),
            "starting R session"
        );
        let output = process::run_captured(
            &self.program,
            [OsStr::new("--vanilla"), staged.path().as_os_str()],
            self.timeout,
        )
        .await?;

        let transcript = protocol::decode(&output.stdout)?;
        for line in &transcript.console {
            debug!(target: "ranalysis::r", "{line}");
        }
        if !output.stderr.trim().is_empty() {
            debug!(target: "ranalysis::r", stderr = %output.stderr.trim_end(), "R diagnostics");
        }

        match transcript.outcome {
            Outcome::Completed => Ok(transcript.results),
            Outcome::Failed(failure) => Err(failure),
            Outcome::Truncated if !output.status.success() => Err(RuntimeFailure::Exit {
                code: output.status.code(),
                stderr: output.stderr.trim_end().to_string(),
            }),
            Outcome::Truncated => Err(RuntimeFailure::Protocol(
                "R session ended before reporting results".into(),
            )),
        }
    }
}
