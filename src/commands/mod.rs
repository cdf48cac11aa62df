//! One function per subcommand. Each writes its report to `out` so it can be
//! pointed at stdout or a buffer.

mod export;
mod inspect;
mod merge;
mod prune;
mod query;
mod summary;
mod validate;

pub use export::export;
pub use inspect::inspect;
pub use merge::merge;
pub use prune::prune;
pub use query::query;
pub use summary::summary;
pub use validate::validate;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::StreamExt;
use implidx_codec::ImplementorRecord;
use implidx_config::Config;
use implidx_extract::models::Implementor;
use implidx_index::TraitFile;
use std::io::Write;
use std::path::Path;
use std::pin::pin;
use tracing::instrument;

pub struct Context {
    pub config: Config,
}
impl Context {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn doc_root(&self) -> &Path {
        &self.config.doc_root
    }
}

/// Everything a scan of the doc root turned up.
#[derive(Debug, Default)]
pub struct Tree {
    /// Sorted by path
    pub files: Vec<TraitFile>,
    pub failures: Vec<implidx_index::error::Error>,
}

/// Scans the doc root, keeping files that failed to read or decode aside.
#[instrument(skip_all, fields(doc_root = %context.doc_root().display()))]
pub async fn load_tree(context: &Context) -> Tree {
    let mut tree = Tree::default();
    let mut stream = pin!(implidx_index::scan(context.doc_root()));
    while let Some(result) = stream.next().await {
        match result {
            Ok(file) => tree.files.push(file),
            Err(err) => tree.failures.push(err),
        }
    }
    tree.files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::info!(files = tree.files.len(), failures = tree.failures.len(), "doc root scanned");
    tree
}

/// Like [`load_tree`], for commands that carry on past unreadable files.
async fn load_files(context: &Context) -> Vec<TraitFile> {
    let tree = load_tree(context).await;
    for failure in &tree.failures {
        tracing::warn!(error = %&**failure, "skipping file");
    }
    tree.files
}

fn flags(record: &ImplementorRecord, implementor: Option<&Implementor>) -> &'static str {
    let negative = implementor.is_some_and(|implementor| implementor.negative);
    match (record.synthetic, negative) {
        (true, true) => "synthetic,negative",
        (true, false) => "synthetic",
        (false, true) => "explicit,negative",
        (false, false) => "explicit",
    }
}

fn line(out: &mut impl Write, args: std::fmt::Arguments<'_>) -> Result<()> {
    writeln!(out, "{args}").or_raise(|| ErrorKind::Output)
}

fn json(out: &mut impl Write, value: &impl serde::Serialize, pretty: bool) -> Result<()> {
    let written = match pretty {
        true => serde_json::to_writer_pretty(&mut *out, value),
        false => serde_json::to_writer(&mut *out, value),
    };
    written.or_raise(|| ErrorKind::Output)?;
    line(out, format_args!(""))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const DEBUG: &str = include_str!("../../crates/index/tests/fixtures/trait.Debug.js");
    pub const SYNC: &str = include_str!("../../crates/index/tests/fixtures/trait.Sync.js");

    pub const DEBUG_PATH: &str = "implementors/core/fmt/trait.Debug.js";
    pub const SYNC_PATH: &str = "pkmnapi_sql/implementors/core/marker/trait.Sync.js";

    /// A doc root holding the two fixtures.
    pub fn doc_tree() -> (tempfile::TempDir, Context) {
        let temp_dir = tempfile::tempdir().unwrap();
        for (path, src) in [(DEBUG_PATH, DEBUG), (SYNC_PATH, SYNC)] {
            let path = temp_dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, src).unwrap();
        }
        let config = Config {
            doc_root: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        (temp_dir, Context::new(config))
    }

    pub fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[tokio::test]
    async fn test_load_tree_keeps_failures() {
        let (temp_dir, context) = doc_tree();
        std::fs::write(temp_dir.path().join("implementors/core/fmt/trait.Display.js"), "oops").unwrap();
        let tree = load_tree(&context).await;
        assert_eq!(tree.files.len(), 2);
        assert_eq!(tree.failures.len(), 1);
        assert_eq!(tree.files[0].path, Path::new(DEBUG_PATH));
    }

    #[test]
    fn test_flags() {
        let record = ImplementorRecord::new("", true, ["a::B"]);
        assert_eq!(flags(&record, None), "synthetic");
        let record = ImplementorRecord::new("", false, ["a::B"]);
        assert_eq!(flags(&record, None), "explicit");
    }
}
