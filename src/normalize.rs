//! Result normalizer: R print output into display-ready line blocks.

use std::sync::OnceLock;

use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::execution::RawResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub label: String,
    pub lines: Vec<String>,
}

/// Normalized output of one invocation, keyed by upper-cased label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    sections: Vec<Section>,
}

impl ResultTable {
    /// Insert or overwrite a section. An existing label keeps its position.
    pub fn insert(&mut self, label: String, lines: Vec<String>) {
        match self.sections.iter_mut().find(|s| s.label == label) {
            Some(section) => section.lines = lines,
            None => self.sections.push(Section { label, lines }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.lines.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.label, &section.lines)?;
        }
        map.end()
    }
}

/// Build a [`ResultTable`] from the raw named values of one invocation.
///
/// Labels that collide after upper-casing overwrite each other; the last one wins.
pub fn normalize(raw: &[RawResult]) -> ResultTable {
    let mut table = ResultTable::default();
    for result in raw {
        table.insert(result.name.to_uppercase(), clean_value(&result.value));
    }
    table
}

fn index_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?m)^[ \t]*\[\d+\][ \t]*").expect("static regex"))
}

fn string_literal() -> &'static Regex {
    static LITERAL: OnceLock<Regex> = OnceLock::new();
    LITERAL.get_or_init(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)"$"#).expect("static regex"))
}

/// Clean one printed value and split it into lines.
///
/// Never returns an empty vector: an empty value is one empty line.
pub fn clean_value(value: &str) -> Vec<String> {
    let stripped = index_marker().replace_all(value, "");
    let body = stripped.trim_end().trim_start_matches(['\n', '\r']);

    // Whitespace inside a string literal is data; only printed output is padded.
    match string_literal().captures(body.trim()) {
        Some(caps) => unescape(&caps[1]).split('\n').map(str::to_string).collect(),
        None => body
            .replace("\\n", "\n")
            .split('\n')
            .map(|line| line.trim_end().to_string())
            .collect(),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => {}
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
