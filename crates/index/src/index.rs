//! An in-memory index over many implementors files.

use crate::trait_file::TraitFile;
use implidx_codec::ImplementorRecord;
use implidx_extract::models::Implementor;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::instrument;

/// `true` when `path` is `query`, or ends with `::query`.
///
/// Lets callers say `Debug` or `fmt::Debug` for `core::fmt::Debug`.
pub fn path_matches(path: &str, query: &str) -> bool {
    path == query
        || path
            .strip_suffix(query)
            .is_some_and(|prefix| prefix.ends_with("::") && !query.is_empty())
}

/// One implementor record, with the context it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    pub trait_path: String,
    pub scope: Option<String>,
    /// The file the record came from, relative to the doc root
    pub source: PathBuf,
    /// The crate key the record is listed under
    pub crate_name: String,
    pub record: ImplementorRecord,
    /// The parsed display fragment; `None` if it didn't parse.
    pub implementor: Option<Implementor>,
}
impl Entry {
    pub fn is_negative(&self) -> bool {
        self.implementor.as_ref().is_some_and(|implementor| implementor.negative)
    }

    /// `true` if any of the type's paths (source or public) matches `query`.
    pub fn is_for_type(&self, query: &str) -> bool {
        self.record.types.iter().any(|path| path_matches(path, query))
            || self
                .implementor
                .as_ref()
                .and_then(Implementor::target_path)
                .is_some_and(|path| path_matches(path, query))
    }

    /// What the entry's target is called in listings.
    pub fn target_display(&self) -> &str {
        match &self.implementor {
            Some(implementor) => implementor.target_path().unwrap_or(&implementor.target.text),
            None => self.record.primary_type().unwrap_or("?"),
        }
    }
}

/// Restricts [`Index::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub crate_name: Option<String>,
    pub trait_path: Option<String>,
    pub type_path: Option<String>,
    pub synthetic: Option<bool>,
}
impl Filter {
    pub fn matches(&self, entry: &Entry) -> bool {
        self.crate_name.as_deref().is_none_or(|name| entry.crate_name == name)
            && self.trait_path.as_deref().is_none_or(|path| path_matches(&entry.trait_path, path))
            && self.type_path.as_deref().is_none_or(|path| entry.is_for_type(path))
            && self.synthetic.is_none_or(|synthetic| entry.record.synthetic == synthetic)
    }
}

/// Per-crate counts for [`Index::summary`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CrateSummary {
    pub crate_name: String,
    /// Distinct traits the crate lists implementors for
    pub traits: usize,
    pub explicit: usize,
    pub synthetic: usize,
    /// `impl !Trait` entries, synthetic or written out
    pub negative: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: Vec<Entry>,
}
impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files<'a>(files: impl IntoIterator<Item = &'a TraitFile>) -> Self {
        let mut index = Self::new();
        for file in files {
            index.insert(file);
        }
        index
    }

    /// Adds every record of `file`, parsing its display fragment.
    #[instrument(skip_all, fields(trait_path = file.trait_path(), records = file.file.len()))]
    pub fn insert(&mut self, file: &TraitFile) {
        for (crate_name, record) in file.file.records() {
            let implementor = match implidx_extract::extract(&record.text) {
                Ok(implementor) => Some(implementor),
                Err(err) => {
                    tracing::debug!(crate_name, error = %err, "display fragment did not parse");
                    None
                },
            };
            self.entries.push(Entry {
                trait_path: file.trait_path().to_string(),
                scope: file.scope().map(str::to_string),
                source: file.path.clone(),
                crate_name: crate_name.to_string(),
                record: record.clone(),
                implementor,
            });
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filter<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |entry| filter.matches(entry))
    }

    /// Everything implementing the trait, which may be given by full path
    /// or by a `::`-suffix of it.
    pub fn implementors_of<'a>(&'a self, trait_path: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |entry| path_matches(&entry.trait_path, trait_path))
    }

    /// Trait paths a type implements, sorted and deduplicated.
    pub fn traits_of(&self, type_path: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.is_for_type(type_path))
            .map(|entry| entry.trait_path.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct crate keys, sorted.
    pub fn crates(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.crate_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summary(&self) -> Vec<CrateSummary> {
        let mut traits: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        let mut summaries: BTreeMap<&str, CrateSummary> = BTreeMap::new();
        for entry in &self.entries {
            let summary = summaries.entry(&entry.crate_name).or_insert_with(|| CrateSummary {
                crate_name: entry.crate_name.clone(),
                ..Default::default()
            });
            if entry.record.synthetic {
                summary.synthetic += 1;
            } else {
                summary.explicit += 1;
            }
            if entry.is_negative() {
                summary.negative += 1;
            }
            traits.entry(&entry.crate_name).or_default().insert(&entry.trait_path);
        }
        summaries
            .into_iter()
            .map(|(name, mut summary)| {
                summary.traits = traits.get(name).map(BTreeSet::len).unwrap_or_default();
                summary
            })
            .collect()
    }
}
impl<'a> FromIterator<&'a TraitFile> for Index {
    fn from_iter<T: IntoIterator<Item = &'a TraitFile>>(iter: T) -> Self {
        Self::from_files(iter)
    }
}
