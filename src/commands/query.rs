use super::{Context, flags, line, load_files};
use crate::error::Result;
use implidx_index::{Filter, Index};
use std::io::Write;
use tracing::instrument;

/// Prints `trait, crate, type, flags` for every matching entry.
#[instrument(skip(context, out))]
pub async fn query(context: &Context, filter: &Filter, out: &mut impl Write) -> Result<()> {
    let files = load_files(context).await;
    let index = Index::from_files(&files);
    let mut matched = 0;
    for entry in index.filter(filter) {
        matched += 1;
        line(
            out,
            format_args!(
                "{}\t{}\t{}\t{}",
                entry.trait_path,
                entry.crate_name,
                entry.target_display(),
                flags(&entry.record, entry.implementor.as_ref()),
            ),
        )?;
    }
    tracing::info!(matched, searched = index.len(), "query done");
    Ok(())
}
