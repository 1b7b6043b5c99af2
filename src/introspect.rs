//! Entry-function signature discovery for R scripts.

use regex::Regex;
use thiserror::Error;

pub const DEFAULT_ENTRY: &str = "process_data";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    #[error("no `{0} <- function(...)` declaration found")]
    MissingDeclaration(String),
    #[error("variadic `...` parameters are not supported")]
    Variadic,
    #[error("parameter `{0}` is declared more than once")]
    Duplicate(String),
}

/// Ordered parameter names of `entry` as declared in `script`.
///
/// The first `entry <- function(...)` (or `=` / `<<-` binding) wins. Names are
/// the comma-separated tokens of the parameter list, trimmed, in source order.
pub fn extract_parameters(script: &str, entry: &str) -> Result<Vec<String>, IntrospectError> {
    let pattern = format!(
        r"(?:^|[^A-Za-z0-9_.]){}\s*(?:<<-|<-|=)\s*function\s*\(([^)]*)\)",
        regex::escape(entry)
    );
    // The pattern is built from an escaped literal and cannot be invalid.
    let re = Regex::new(&pattern).map_err(|_| IntrospectError::MissingDeclaration(entry.to_string()))?;
    let caps = re
        .captures(script)
        .ok_or_else(|| IntrospectError::MissingDeclaration(entry.to_string()))?;

    let mut names: Vec<String> = Vec::new();
    for raw in caps[1].split(',') {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if name == "..." {
            return Err(IntrospectError::Variadic);
        }
        if names.iter().any(|n| n == name) {
            return Err(IntrospectError::Duplicate(name.to_string()));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_identifier_does_not_match() {
        let script = "my_process_data <- function(a) a\n";
        assert_eq!(
            extract_parameters(script, "process_data"),
            Err(IntrospectError::MissingDeclaration("process_data".into()))
        );
    }

    #[test]
    fn entry_name_is_escaped() {
        let script = "run.analysis <- function(a, b) list(a = a)\n";
        assert_eq!(extract_parameters(script, "run.analysis").unwrap(), vec!["a", "b"]);
        assert!(extract_parameters("runXanalysis <- function(a) a", "run.analysis").is_err());
    }
}
