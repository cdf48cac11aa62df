use super::{Context, json, load_files};
use crate::error::Result;
use implidx_index::Index;
use std::io::Write;

/// Every indexed entry, fragment parsed, as a JSON array.
pub async fn export(context: &Context, pretty: bool, out: &mut impl Write) -> Result<()> {
    let files = load_files(context).await;
    let index = Index::from_files(&files);
    json(out, &index.entries(), pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{doc_tree, output};

    #[tokio::test]
    async fn test_export() {
        let (_temp_dir, context) = doc_tree();
        let mut buffer = Vec::new();
        export(&context, false, &mut buffer).await.unwrap();
        let text = output(buffer);
        assert_eq!(text.lines().count(), 1);

        let entries: serde_json::Value = serde_json::from_str(&text).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[0]["trait_path"], "core::fmt::Debug");
        assert_eq!(entries[0]["scope"], serde_json::Value::Null);
        assert_eq!(entries[0]["record"]["types"][0], "pkmnapi_db::cry::channel::Channel");
        assert_eq!(entries[0]["implementor"]["target"]["item"]["path"], "pkmnapi_db::cry::Channel");
        assert_eq!(entries[8]["scope"], "pkmnapi_sql");
        assert_eq!(entries[8]["record"]["synthetic"], true);
    }
}
