//! Marker-line protocol spoken by the driver program on stdout.
//!
//! Each record is a line `@@ranalysis <tag> x<hex> x<hex> …` where every field
//! is the hex-encoded UTF-8 text prefixed with `x` so empty fields survive
//! whitespace splitting. Tags:
//!
//! - `result <name> <value>`: one named element of the result
//! - `error <phase> <message>`: the session gave up in `phase`
//! - `done`: all results were reported
//!
//! Any other stdout line is console output produced by the script itself.

use crate::error::{RuntimeFailure, ScriptPhase};

use super::RawResult;

pub const MARKER: &str = "@@ranalysis";

#[derive(Debug)]
pub enum Outcome {
    Completed,
    Failed(RuntimeFailure),
    /// Output ended without `done` or `error`.
    Truncated,
}

#[derive(Debug)]
pub struct Transcript {
    pub results: Vec<RawResult>,
    pub console: Vec<String>,
    pub outcome: Outcome,
}

pub fn decode(stdout: &str) -> Result<Transcript, RuntimeFailure> {
    let mut results = Vec::new();
    let mut console = Vec::new();

    for line in stdout.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some(MARKER) {
            if !line.trim().is_empty() {
                console.push(line.to_string());
            }
            continue;
        }
        let tag = parts
            .next()
            .ok_or_else(|| RuntimeFailure::Protocol("marker line without tag".into()))?;
        let fields = parts.map(decode_field).collect::<Result<Vec<_>, _>>()?;

        match (tag, fields.as_slice()) {
            ("result", [name, value]) => results.push(RawResult::new(name.clone(), value.clone())),
            ("done", []) => {
                return Ok(Transcript {
                    results,
                    console,
                    outcome: Outcome::Completed,
                })
            }
            ("error", [phase, message]) => {
                let failure = match phase.as_str() {
                    "load" => RuntimeFailure::Script {
                        phase: ScriptPhase::Load,
                        message: message.clone(),
                    },
                    "invoke" => RuntimeFailure::Script {
                        phase: ScriptPhase::Invoke,
                        message: message.clone(),
                    },
                    "resolve" => RuntimeFailure::MissingEntry(message.clone()),
                    "result" => RuntimeFailure::UnnamedResult,
                    other => {
                        return Err(RuntimeFailure::Protocol(format!(
                            "unknown error phase `{other}`"
                        )))
                    }
                };
                return Ok(Transcript {
                    results,
                    console,
                    outcome: Outcome::Failed(failure),
                });
            }
            (tag, fields) => {
                return Err(RuntimeFailure::Protocol(format!(
                    "unexpected `{tag}` record with {} field(s)",
                    fields.len()
                )))
            }
        }
    }

    Ok(Transcript {
        results,
        console,
        outcome: Outcome::Truncated,
    })
}

fn decode_field(field: &str) -> Result<String, RuntimeFailure> {
    let encoded = field
        .strip_prefix('x')
        .ok_or_else(|| RuntimeFailure::Protocol(format!("bad field `{field}`")))?;
    let bytes = hex::decode(encoded)
        .map_err(|e| RuntimeFailure::Protocol(format!("bad hex in `{field}`: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
