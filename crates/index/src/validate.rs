//! Consistency checks for implementors files.

use crate::trait_file::TraitFile;
use derive_more::Display;
use implidx_codec::ImplementorRecord;
use std::collections::HashSet;
use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::instrument;

/// How bad an [`Issue`] is. Ordered, so `>=` filters work.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Severity {
    #[display("info")]
    Info,
    #[default]
    #[display("warning")]
    #[cfg_attr(feature = "serde", serde(alias = "warn"))]
    Warning,
    #[display("error")]
    Error,
}
impl FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(tag = "kind", content = "detail", rename_all = "snake_case"))]
pub enum IssueKind {
    #[display("display fragment does not parse: {_0}")]
    UnparseableFragment(String),
    #[display("fragment implements {found}, file is for {expected}")]
    TraitMismatch { expected: String, found: String },
    /// `types` is empty, or its first entry has no crate segment
    #[display("record lists no usable type path")]
    EmptyTypes,
    #[display("type {type_path} is not defined in the crate it is listed under")]
    ForeignType { type_path: String },
    #[display("record appears more than once")]
    Duplicate,
    #[display("{public} is a re-export of {source}")]
    ReExported { public: String, source: String },
}
impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnparseableFragment(_) | Self::TraitMismatch { .. } | Self::EmptyTypes => Severity::Error,
            Self::ForeignType { .. } | Self::Duplicate => Severity::Warning,
            Self::ReExported { .. } => Severity::Info,
        }
    }
}

/// Something wrong with one record of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Issue {
    /// File, relative to the doc root
    pub path: PathBuf,
    pub crate_name: String,
    /// Position of the record in the crate's list
    pub index: usize,
    pub kind: IssueKind,
}
impl Issue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
impl FmtDisplay for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: {} [{}#{}]: {}",
            self.severity(),
            self.path.display(),
            self.crate_name,
            self.index,
            self.kind
        )
    }
}

/// Checks every record of `file`, in crate then record order.
#[instrument(skip_all, fields(path = %file.path.display(), records = file.file.len()))]
pub fn validate(file: &TraitFile) -> Vec<Issue> {
    let mut issues = Vec::new();
    for crate_name in file.file.crates() {
        let records = file.file.get(crate_name).unwrap_or_default();
        let mut seen: HashSet<&ImplementorRecord> = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            let issue = |kind: IssueKind| Issue {
                path: file.path.clone(),
                crate_name: crate_name.to_string(),
                index,
                kind,
            };
            if !seen.insert(record) {
                issues.push(issue(IssueKind::Duplicate));
            }
            issues.extend(check_record(file.trait_path(), crate_name, record).into_iter().map(issue));
        }
    }
    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "file has issues");
    }
    issues
}

fn check_record(trait_path: &str, crate_name: &str, record: &ImplementorRecord) -> Vec<IssueKind> {
    let mut kinds = Vec::new();
    let defined_in = record.crate_name();
    match defined_in {
        None => kinds.push(IssueKind::EmptyTypes),
        Some(defined_in) if defined_in != crate_name => kinds.push(IssueKind::ForeignType {
            type_path: record.primary_type().unwrap_or_default().to_string(),
        }),
        Some(_) => {},
    }

    let implementor = match implidx_extract::extract(&record.text) {
        Ok(implementor) => implementor,
        Err(err) => {
            kinds.push(IssueKind::UnparseableFragment(err.to_string()));
            return kinds;
        },
    };
    if let Some(found) = implementor.trait_ref.path.as_deref()
        && found != trait_path
    {
        kinds.push(IssueKind::TraitMismatch {
            expected: trait_path.to_string(),
            found: found.to_string(),
        });
    }
    // Without a usable type path there is nothing to compare the link against.
    if let (Some(public), Some(source)) = (implementor.target_path(), record.primary_type())
        && defined_in.is_some()
        && public != source
    {
        kinds.push(IssueKind::ReExported {
            public: public.to_string(),
            source: source.to_string(),
        });
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Location;
    use implidx_codec::ImplementorsFile;
    use rstest::rstest;

    const HEADER: &str = r#"impl <a class="trait" title="trait core::fmt::Debug">Debug</a> for <a class="struct" title="struct pkmnapi_db::header::Header">Header</a>"#;

    fn file(records: Vec<ImplementorRecord>) -> TraitFile {
        let file: ImplementorsFile = [("pkmnapi_db".to_string(), records)].into_iter().collect();
        TraitFile::new(Location::new(None::<String>, "core::fmt::Debug"), file).unwrap()
    }

    fn kinds(records: Vec<ImplementorRecord>) -> Vec<IssueKind> {
        validate(&file(records)).into_iter().map(|issue| issue.kind).collect()
    }

    #[rstest]
    #[case("info", Severity::Info)]
    #[case("Warning", Severity::Warning)]
    #[case("warn", Severity::Warning)]
    #[case(" error ", Severity::Error)]
    fn test_severity_from_str(#[case] input: &str, #[case] expected: Severity) {
        assert_eq!(input.parse::<Severity>().unwrap(), expected);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_clean_record() {
        assert!(kinds(vec![ImplementorRecord::new(HEADER, false, ["pkmnapi_db::header::Header"])]).is_empty());
    }

    #[rstest]
    #[case::none(&[])]
    #[case::blank(&[""])]
    #[case::no_crate(&["::header::Header"])]
    fn test_empty_types(#[case] types: &[&str]) {
        let found = kinds(vec![ImplementorRecord::new(HEADER, false, types.iter().copied())]);
        assert_eq!(found, vec![IssueKind::EmptyTypes]);
        assert_eq!(found[0].to_string(), "record lists no usable type path");
    }

    #[test]
    fn test_foreign_type() {
        let text = r#"impl <a class="trait" title="trait core::fmt::Debug">Debug</a> for <a class="struct" title="struct other::Thing">Thing</a>"#;
        assert_eq!(
            kinds(vec![ImplementorRecord::new(text, false, ["other::Thing"])]),
            vec![IssueKind::ForeignType { type_path: "other::Thing".to_string() }]
        );
    }

    #[test]
    fn test_trait_mismatch() {
        let text = r#"impl <a class="trait" title="trait core::clone::Clone">Clone</a> for <a class="struct" title="struct pkmnapi_db::header::Header">Header</a>"#;
        assert_eq!(
            kinds(vec![ImplementorRecord::new(text, false, ["pkmnapi_db::header::Header"])]),
            vec![IssueKind::TraitMismatch {
                expected: "core::fmt::Debug".to_string(),
                found: "core::clone::Clone".to_string(),
            }]
        );
    }

    #[test]
    fn test_unparseable() {
        let found = kinds(vec![ImplementorRecord::new("not an impl", false, ["pkmnapi_db::X"])]);
        assert_eq!(found.len(), 1);
        assert!(matches!(&found[0], IssueKind::UnparseableFragment(_)));
        assert_eq!(found[0].severity(), Severity::Error);
    }

    #[test]
    fn test_re_exported() {
        let found = kinds(vec![ImplementorRecord::new(HEADER, false, ["pkmnapi_db::private::header::Header"])]);
        assert_eq!(
            found,
            vec![IssueKind::ReExported {
                public: "pkmnapi_db::header::Header".to_string(),
                source: "pkmnapi_db::private::header::Header".to_string(),
            }]
        );
        assert_eq!(found[0].severity(), Severity::Info);
    }

    #[test]
    fn test_duplicate() {
        let record = ImplementorRecord::new(HEADER, false, ["pkmnapi_db::header::Header"]);
        let issues = validate(&file(vec![record.clone(), record]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Duplicate);
        assert_eq!(issues[0].index, 1);
        assert_eq!(
            issues[0].to_string(),
            "warning: implementors/core/fmt/trait.Debug.js [pkmnapi_db#1]: record appears more than once"
        );
    }
}
