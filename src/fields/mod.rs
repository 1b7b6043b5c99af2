//! Field parser: whitespace-delimited rows into positional "Field N" columns.
//!
//! Rows are split on spaces and tabs. The field set grows on demand, so a row
//! wider than every row before it creates new fields that only start receiving
//! values from that row on. Rows narrower than the current field count append
//! nothing to the excess fields, which leaves those columns shorter than the
//! others. Callers that need aligned columns should check [`FieldTable::is_ragged`].

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A single parsed token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Standard decimal parse; anything that does not parse stays text.
    pub fn parse(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(n) => Scalar::Number(n),
            Err(_) => Scalar::Text(token.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Number(_) => "number",
            Scalar::Text(_) => "text",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered values of one field, classified while they are collected.
///
/// `Mixed` holds numbers and text side by side and cannot be handed to R.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Numeric(Vec<f64>),
    Text(Vec<String>),
    Mixed(Vec<Scalar>),
}

impl Default for Series {
    fn default() -> Self {
        Series::Numeric(Vec::new())
    }
}

impl Series {
    /// Parse whitespace-separated tokens with the same per-token rules as rows.
    pub fn parse_tokens(text: &str) -> Self {
        tokens(text).map(Scalar::parse).collect()
    }

    pub fn push(&mut self, value: Scalar) {
        if self.is_empty() {
            *self = match value {
                Scalar::Number(n) => Series::Numeric(vec![n]),
                Scalar::Text(s) => Series::Text(vec![s]),
            };
            return;
        }
        match (self, value) {
            (Series::Numeric(values), Scalar::Number(n)) => values.push(n),
            (Series::Text(values), Scalar::Text(s)) => values.push(s),
            (Series::Mixed(values), value) => values.push(value),
            (series, value) => {
                let mut all = series.scalars();
                all.push(value);
                *series = Series::Mixed(all);
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Numeric(v) => v.len(),
            Series::Text(v) => v.len(),
            Series::Mixed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Series::Numeric(_) => "numeric",
            Series::Text(_) => "text",
            Series::Mixed(_) => "mixed",
        }
    }

    pub fn scalars(&self) -> Vec<Scalar> {
        match self {
            Series::Numeric(v) => v.iter().copied().map(Scalar::Number).collect(),
            Series::Text(v) => v.iter().cloned().map(Scalar::Text).collect(),
            Series::Mixed(v) => v.clone(),
        }
    }
}

impl FromIterator<Scalar> for Series {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        let mut series = Series::default();
        for value in iter {
            series.push(value);
        }
        series
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::Numeric(values)
    }
}

impl From<Vec<String>> for Series {
    fn from(values: Vec<String>) -> Self {
        Series::Text(values)
    }
}

/// A bare string becomes a one-element text series.
impl From<&str> for Series {
    fn from(value: &str) -> Self {
        Series::Text(vec![value.to_string()])
    }
}

impl From<String> for Series {
    fn from(value: String) -> Self {
        Series::Text(vec![value])
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Series::Numeric(v) => v.serialize(serializer),
            Series::Text(v) => v.serialize(serializer),
            Series::Mixed(v) => v.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub series: Series,
}

/// Parsed input keyed by positional field name, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    fields: Vec<Field>,
}

pub fn field_name(index: usize) -> String {
    format!("Field {}", index + 1)
}

/// Parse raw text into a [`FieldTable`]. Empty input yields an empty table.
pub fn parse(text: &str) -> FieldTable {
    let mut fields: Vec<Field> = Vec::new();
    for line in text.lines() {
        for (i, token) in tokens(line).enumerate() {
            if i == fields.len() {
                fields.push(Field {
                    name: field_name(i),
                    series: Series::default(),
                });
            }
            fields[i].series.push(Scalar::parse(token));
        }
    }
    FieldTable { fields }
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split([' ', '\t']).filter(|t| !t.is_empty())
}

impl FieldTable {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.series)
    }

    /// Look a field up by `Field N`, `field n`, or the bare index `N`.
    pub fn resolve(&self, selector: &str) -> Option<&Field> {
        let trimmed = selector.trim();
        let digits = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("field") => trimmed[5..].trim(),
            _ => trimmed,
        };
        let index = digits.parse::<usize>().ok()?.checked_sub(1)?;
        self.fields.get(index)
    }

    /// True when the fields ended up with different lengths.
    pub fn is_ragged(&self) -> bool {
        let mut lengths = self.fields.iter().map(|f| f.series.len());
        match lengths.next() {
            Some(first) => lengths.any(|len| len != first),
            None => false,
        }
    }
}

impl Serialize for FieldTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.series)?;
        }
        map.end()
    }
}
