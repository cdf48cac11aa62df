use super::{Context, json, line, load_files};
use crate::error::Result;
use implidx_index::Index;
use std::io::Write;

pub async fn summary(context: &Context, as_json: bool, out: &mut impl Write) -> Result<()> {
    let files = load_files(context).await;
    let summaries = Index::from_files(&files).summary();
    if as_json {
        return json(out, &summaries, true);
    }

    line(
        out,
        format_args!("{:<32} {:>6} {:>8} {:>9} {:>8}", "crate", "traits", "explicit", "synthetic", "negative"),
    )?;
    for summary in &summaries {
        line(
            out,
            format_args!(
                "{:<32} {:>6} {:>8} {:>9} {:>8}",
                summary.crate_name, summary.traits, summary.explicit, summary.synthetic, summary.negative
            ),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{doc_tree, output};

    #[tokio::test]
    async fn test_table() {
        let (_temp_dir, context) = doc_tree();
        let mut buffer = Vec::new();
        summary(&context, false, &mut buffer).await.unwrap();
        let text = output(buffer);
        let rows: Vec<Vec<&str>> = text.lines().map(|line| line.split_whitespace().collect()).collect();
        assert_eq!(
            rows,
            vec![
                vec!["crate", "traits", "explicit", "synthetic", "negative"],
                vec!["pkmnapi_db", "1", "5", "0", "0"],
                vec!["pkmnapi_sql", "1", "0", "4", "0"],
            ]
        );
    }

    #[tokio::test]
    async fn test_json() {
        let (_temp_dir, context) = doc_tree();
        let mut buffer = Vec::new();
        summary(&context, true, &mut buffer).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(buffer)).unwrap();
        assert_eq!(value[1]["crate_name"], "pkmnapi_sql");
        assert_eq!(value[1]["synthetic"], 4);
    }

    #[tokio::test]
    async fn test_empty_doc_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let context = Context::new(implidx_config::Config {
            doc_root: temp_dir.path().join("missing"),
            ..Default::default()
        });
        let mut buffer = Vec::new();
        summary(&context, false, &mut buffer).await.unwrap();
        assert_eq!(output(buffer).lines().count(), 1);
    }
}
