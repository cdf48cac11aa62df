//! The implementors script: one trait, many crates.

use crate::error::{ErrorKind, Result};
use crate::handoff::Handoff;
use crate::parse::Cursor;
use crate::record::ImplementorRecord;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::instrument;

/// Name of the local variable rustdoc declares inside the script.
const VARIABLE: &str = "implementors";

/// How [`ImplementorsFile::merge`] resolves a crate present in both files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// The incoming list replaces the existing one (a crate was re-documented).
    #[default]
    #[serde(alias = "overwrite")]
    Replace,
    /// The existing list wins.
    #[serde(alias = "skip")]
    Keep,
    /// Overlap is an error.
    #[serde(alias = "error")]
    Strict,
}
impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Keep => "keep",
            Self::Strict => "strict",
        }
    }
}
impl FromStr for MergePolicy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" | "overwrite" => Ok(Self::Replace),
            "keep" | "skip" => Ok(Self::Keep),
            "strict" | "error" => Ok(Self::Strict),
            other => Err(format!("unknown merge policy: {other}")),
        }
    }
}
impl Display for MergePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Every implementor of one trait, grouped by the crate whose documentation
/// contributed them.
///
/// Crates are kept sorted by name, which is also the order rustdoc writes
/// them in. The records of each crate keep their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementorsFile {
    crates: BTreeMap<String, Vec<ImplementorRecord>>,
}

/// Decoding
impl ImplementorsFile {
    /// Parses a script, discarding the handoff names.
    pub fn parse(src: &str) -> Result<Self> {
        Self::parse_with_handoff(src).map(|(file, _)| file)
    }

    /// Parses a script, also returning the globals it hands its data to.
    #[instrument(skip(src), fields(src_size = src.len(), crates, records))]
    pub fn parse_with_handoff(src: &str) -> Result<(Self, Handoff)> {
        let mut cursor = Cursor::new(src);
        // (function() {var implementors = {};
        for token in ["(", "function", "(", ")", "{"] {
            cursor.expect(token)?;
        }
        cursor.expect_word("var")?;
        let variable = cursor.identifier()?;
        for token in ["=", "{", "}", ";"] {
            cursor.expect(token)?;
        }

        // implementors["crate"] = [...];
        let mut file = Self::default();
        while cursor.eat_word(variable) {
            cursor.expect("[")?;
            let offset = cursor.offset();
            let name: String = cursor.json("crate name")?;
            cursor.expect("]")?;
            cursor.expect("=")?;
            let records: Vec<ImplementorRecord> = cursor.json("record list")?;
            cursor.expect(";")?;
            match file.crates.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(records);
                },
                Entry::Occupied(slot) => {
                    tracing::debug!(offset, "crate assigned twice");
                    exn::bail!(ErrorKind::DuplicateCrate(slot.key().clone()));
                },
            }
        }

        // if (window.a) {window.a(implementors);} else {window.b = implementors;}})()
        cursor.expect_word("if")?;
        cursor.expect("(")?;
        let register = Self::window_member(&mut cursor)?;
        cursor.expect(")")?;
        cursor.expect("{")?;
        if Self::window_member(&mut cursor)? != register {
            exn::bail!(ErrorKind::Malformed {
                offset: cursor.offset(),
                expected: "the same register hook in both branches",
            });
        }
        cursor.expect("(")?;
        Self::expect_variable(&mut cursor, variable)?;
        for token in [")", ";", "}"] {
            cursor.expect(token)?;
        }
        cursor.expect_word("else")?;
        cursor.expect("{")?;
        let pending = Self::window_member(&mut cursor)?;
        cursor.expect("=")?;
        Self::expect_variable(&mut cursor, variable)?;
        for token in [";", "}", "}", ")", "(", ")"] {
            cursor.expect(token)?;
        }
        cursor.eat(";");
        if !cursor.at_end() {
            exn::bail!(ErrorKind::Malformed {
                offset: cursor.offset(),
                expected: "end of file",
            });
        }

        let handoff = Handoff::new(register, pending)?;
        let span = tracing::Span::current();
        span.record("crates", file.crates.len());
        span.record("records", file.len());
        Ok((file, handoff))
    }

    fn window_member<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str> {
        cursor.expect_word("window")?;
        cursor.expect(".")?;
        cursor.identifier()
    }

    fn expect_variable(cursor: &mut Cursor<'_>, variable: &str) -> Result<()> {
        if cursor.eat_word(variable) {
            Ok(())
        } else {
            exn::bail!(ErrorKind::Malformed {
                offset: cursor.offset(),
                expected: "the implementors variable",
            })
        }
    }
}

/// Encoding
impl ImplementorsFile {
    /// Renders the script byte-for-byte the way rustdoc does.
    #[instrument(skip_all, fields(crates = self.crates.len(), handoff = %handoff))]
    pub fn render(&self, handoff: &Handoff) -> Result<String> {
        let mut out = format!("(function() {{var {VARIABLE} = {{}};\n");
        for (name, records) in &self.crates {
            let key = serde_json::to_string(name).or_raise(|| ErrorKind::Json {
                offset: out.len(),
                what: "crate name",
            })?;
            let list = serde_json::to_string(records).or_raise(|| ErrorKind::Json {
                offset: out.len(),
                what: "record list",
            })?;
            out.push_str(&format!("{VARIABLE}[{key}] = {list};\n"));
        }
        out.push_str(&handoff.statement(VARIABLE));
        out.push_str("})()");
        Ok(out)
    }
}

/// Access & editing
impl ImplementorsFile {
    /// Sets the records of a crate, returning the list it replaced.
    pub fn insert(&mut self, crate_name: impl Into<String>, records: Vec<ImplementorRecord>) -> Option<Vec<ImplementorRecord>> {
        self.crates.insert(crate_name.into(), records)
    }

    pub fn get(&self, crate_name: &str) -> Option<&[ImplementorRecord]> {
        self.crates.get(crate_name).map(Vec::as_slice)
    }

    pub fn crates(&self) -> impl Iterator<Item = &str> {
        self.crates.keys().map(String::as_str)
    }

    /// All records, paired with the crate they are listed under.
    pub fn records(&self) -> impl Iterator<Item = (&str, &ImplementorRecord)> {
        self.crates
            .iter()
            .flat_map(|(name, records)| records.iter().map(move |record| (name.as_str(), record)))
    }

    /// Total number of records across all crates.
    pub fn len(&self) -> usize {
        self.crates.values().map(Vec::len).sum()
    }

    /// `true` when no crate lists a single record. A file with crate keys
    /// that map to empty lists is still empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn retain_crates(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.crates.retain(|name, _| keep(name));
    }

    /// Folds another file for the same trait into this one.
    #[instrument(skip_all, fields(policy = %policy, incoming = other.crates.len()))]
    pub fn merge(&mut self, other: Self, policy: MergePolicy) -> Result<()> {
        if policy == MergePolicy::Strict
            && let Some(name) = other.crates.keys().find(|name| self.crates.contains_key(*name))
        {
            exn::bail!(ErrorKind::Conflict(name.clone()));
        }
        for (name, records) in other.crates {
            match self.crates.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(records);
                },
                Entry::Occupied(mut slot) => match policy {
                    MergePolicy::Replace => {
                        tracing::debug!(crate_name = slot.key().as_str(), "replacing implementors");
                        slot.insert(records);
                    },
                    MergePolicy::Keep => {
                        tracing::debug!(crate_name = slot.key().as_str(), "keeping existing implementors");
                    },
                    // Overlap was rejected above.
                    MergePolicy::Strict => unreachable!(),
                },
            }
        }
        Ok(())
    }
}
impl FromStr for ImplementorsFile {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}
impl FromIterator<(String, Vec<ImplementorRecord>)> for ImplementorsFile {
    fn from_iter<T: IntoIterator<Item = (String, Vec<ImplementorRecord>)>>(iter: T) -> Self {
        Self { crates: iter.into_iter().collect() }
    }
}
