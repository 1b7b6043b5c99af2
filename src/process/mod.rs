//! Interpreter process management: spawn, capture output, optional deadline.

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::RuntimeFailure;

#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` to completion with stdin closed and both output streams captured.
///
/// With a `deadline` the child is killed once it expires.
pub async fn run_captured<I, S>(
    program: &str,
    args: I,
    deadline: Option<Duration>,
) -> Result<CapturedOutput, RuntimeFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| RuntimeFailure::Spawn {
        program: program.to_string(),
        source,
    })?;

    let waited = match deadline {
        Some(limit) => timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| RuntimeFailure::Timeout(limit))?,
        None => child.wait_with_output().await,
    };
    let out = waited.map_err(|source| RuntimeFailure::Spawn {
        program: program.to_string(),
        source,
    })?;

    Ok(CapturedOutput {
        status: out.status,
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}
