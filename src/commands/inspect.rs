use super::{flags, json, line};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use implidx_codec::{ImplementorRecord, ImplementorsFile};
use implidx_extract::models::Implementor;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

#[derive(Debug, Serialize)]
struct Row<'a> {
    crate_name: &'a str,
    record: &'a ImplementorRecord,
    implementor: Option<Implementor>,
}

/// Lists the records of one file. Works on any file, wherever it lives.
#[instrument(skip(out))]
pub async fn inspect(path: &Path, as_json: bool, out: &mut impl Write) -> Result<()> {
    let src = tokio::fs::read_to_string(path).await.or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let (file, handoff) =
        ImplementorsFile::parse_with_handoff(&src).or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
    if !handoff.is_default() {
        tracing::info!(%handoff, "file uses a custom handoff");
    }

    let rows: Vec<Row<'_>> = file
        .records()
        .map(|(crate_name, record)| Row {
            crate_name,
            record,
            implementor: implidx_extract::extract(&record.text).ok(),
        })
        .collect();
    if as_json {
        return json(out, &rows, true);
    }

    for row in &rows {
        let row_flags = flags(row.record, row.implementor.as_ref());
        match &row.implementor {
            Some(implementor) => line(
                out,
                format_args!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.crate_name,
                    implementor.target_kind().map(|kind| kind.as_str()).unwrap_or("-"),
                    implementor.target_path().unwrap_or(&implementor.target.text),
                    implementor.trait_ref.path_or_name(),
                    row_flags,
                ),
            )?,
            None => line(
                out,
                format_args!(
                    "{}\t?\t{}\t?\t{}",
                    row.crate_name,
                    row.record.primary_type().unwrap_or("?"),
                    row_flags,
                ),
            )?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{DEBUG, SYNC, output};

    async fn run(src: &str, as_json: bool) -> String {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("trait.Whatever.js");
        std::fs::write(&path, src).unwrap();
        let mut buffer = Vec::new();
        inspect(&path, as_json, &mut buffer).await.unwrap();
        output(buffer)
    }

    #[tokio::test]
    async fn test_text() {
        let text = run(DEBUG, false).await;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "pkmnapi_db\tstruct\tpkmnapi_db::cry::Channel\tcore::fmt::Debug\texplicit");
        assert_eq!(lines[4], "pkmnapi_db\tstruct\tpkmnapi_db::PkmnapiDB\tcore::fmt::Debug\texplicit");

        let text = run(SYNC, false).await;
        assert!(text.lines().all(|line| line.ends_with("\tcore::marker::Sync\tsynthetic")));
    }

    #[tokio::test]
    async fn test_json() {
        let text = run(SYNC, true).await;
        let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3]["crate_name"], "pkmnapi_sql");
        assert_eq!(rows[3]["record"]["synthetic"], true);
        assert_eq!(rows[3]["implementor"]["trait_ref"]["path"], "core::marker::Sync");
        assert_eq!(rows[3]["implementor"]["target"]["item"]["kind"], "struct");
    }

    #[tokio::test]
    async fn test_not_an_implementors_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("search-index.js");
        std::fs::write(&path, "var searchIndex = {};").unwrap();
        let err = inspect(&path, false, &mut Vec::new()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Decode(_)));
    }
}
