use super::Context;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use implidx_codec::{ImplementorsFile, MergePolicy};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

async fn read(path: &Path) -> Result<ImplementorsFile> {
    let src = fs::read_to_string(path).await.or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    ImplementorsFile::parse(&src).or_raise(|| ErrorKind::Decode(path.to_path_buf()))
}

/// The trait a path documents, if it sits where rustdoc would put it.
fn located_trait(context: &Context, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(context.doc_root()).unwrap_or(path);
    implidx_index::layout::locate(relative).ok().map(|location| location.trait_path)
}

/// The trait `file` documents: from its path when that follows the doc-root
/// layout, else from the first fragment that links one.
fn documented_trait(context: &Context, path: &Path, file: &ImplementorsFile) -> Option<String> {
    located_trait(context, path).or_else(|| {
        file.records()
            .find_map(|(_, record)| implidx_extract::extract(&record.text).ok()?.trait_ref.path)
    })
}

/// Folds `inputs` left to right into one file and writes it to `output`
/// with the configured handoff. Every input must document the same trait,
/// and so must `output` if it lies in the doc-root layout. Nothing is
/// written if any input fails.
#[instrument(skip(context))]
pub async fn merge(context: &Context, output: &Path, inputs: &[PathBuf], policy: MergePolicy) -> Result<()> {
    let handoff = context.config.handoff.handoff().or_raise(|| ErrorKind::Config)?;
    let mut expected = located_trait(context, output);
    let mut merged = ImplementorsFile::default();
    for input in inputs {
        let file = read(input).await?;
        let found = documented_trait(context, input, &file);
        if let (Some(expected), Some(found)) = (&expected, &found)
            && expected != found
        {
            exn::bail!(ErrorKind::TraitMismatch {
                path: input.clone(),
                expected: expected.clone(),
                found: found.clone(),
            });
        }
        if found.is_none() {
            tracing::debug!(input = %input.display(), "trait not known, merging anyway");
        }
        if expected.is_none() {
            expected = found;
        }
        merged.merge(file, policy).or_raise(|| ErrorKind::Merge(input.clone()))?;
    }

    let rendered = merged.render(&handoff).or_raise(|| ErrorKind::Write(output.to_path_buf()))?;
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Write(output.to_path_buf()))?;
    }
    fs::write(output, rendered).await.or_raise(|| ErrorKind::Write(output.to_path_buf()))?;
    tracing::info!(
        trait_path = expected.as_deref().unwrap_or("?"),
        crates = merged.crates().count(),
        records = merged.len(),
        "merged file written"
    );
    Ok(())
}
