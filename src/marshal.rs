//! Conversion of parsed series into R vector literals.

use std::fmt::Write as _;

use crate::error::{AnalysisError, AnalysisResult};
use crate::fields::{Scalar, Series};

/// An R atomic vector ready to be spliced into a call.
#[derive(Debug, Clone, PartialEq)]
pub enum RVector {
    Numeric(Vec<f64>),
    Character(Vec<String>),
}

impl RVector {
    pub fn len(&self) -> usize {
        match self {
            RVector::Numeric(v) => v.len(),
            RVector::Character(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RVector::Numeric(_) => "numeric",
            RVector::Character(_) => "character",
        }
    }

    /// R source expression that evaluates to this vector.
    pub fn to_r_literal(&self) -> String {
        match self {
            RVector::Numeric(v) if v.is_empty() => "numeric(0)".to_string(),
            RVector::Character(v) if v.is_empty() => "character(0)".to_string(),
            RVector::Numeric(v) => {
                let items: Vec<String> = v.iter().map(|n| r_number(*n)).collect();
                format!("c({})", items.join(", "))
            }
            RVector::Character(v) => {
                let items: Vec<String> = v.iter().map(|s| quote_r_string(s)).collect();
                format!("c({})", items.join(", "))
            }
        }
    }
}

/// Marshal the series bound to `parameter`.
///
/// Numeric series become numeric vectors and text series character vectors.
/// Mixed series and text containing NUL are rejected with [`AnalysisError::Type`].
pub fn to_runtime_vector(parameter: &str, series: &Series) -> AnalysisResult<RVector> {
    match series {
        Series::Numeric(values) => Ok(RVector::Numeric(values.clone())),
        Series::Text(values) => match values.iter().position(|v| v.contains('\0')) {
            // R strings cannot hold NUL.
            Some(i) => Err(AnalysisError::Type {
                parameter: parameter.to_string(),
                found: format!("text value containing a NUL character at position {}", i + 1),
            }),
            None => Ok(RVector::Character(values.clone())),
        },
        Series::Mixed(values) => Err(AnalysisError::Type {
            parameter: parameter.to_string(),
            found: describe_mixed(values),
        }),
    }
}

fn describe_mixed(values: &[Scalar]) -> String {
    let Some(first) = values.first() else {
        return "empty mixed series".to_string();
    };
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| v.type_name() != first.type_name())
    {
        Some((i, odd)) => format!(
            "{} value `{}` at position {} in a series of {} values",
            odd.type_name(),
            odd,
            i + 1,
            first.type_name()
        ),
        None => format!("mixed series of {} values", first.type_name()),
    }
}

fn r_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Inf".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{n:?}")
    }
}

/// Double-quoted R string literal; non-ASCII characters use `\U{..}` escapes
/// so the driver program stays independent of the R session's locale.
pub fn quote_r_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if !c.is_ascii() => {
                let _ = write!(out, "\\U{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
