use super::{Context, line, load_files};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use tracing::instrument;

/// Drops `crate_name` from every file that lists it, rewriting the file in
/// place with the handoff it was read with.
#[instrument(skip(context, out))]
pub async fn prune(context: &Context, crate_name: &str, dry_run: bool, out: &mut impl Write) -> Result<()> {
    let mut changed = 0;
    for mut file in load_files(context).await {
        let Some(removed) = file.file.get(crate_name).map(<[_]>::len) else {
            continue;
        };
        file.file.retain_crates(|name| name != crate_name);
        if !dry_run {
            file.write(context.doc_root()).await.or_raise(|| ErrorKind::Write(file.path.clone()))?;
        }
        changed += 1;
        line(out, format_args!("{}: {removed} records removed", file.path.display()))?;
    }
    tracing::info!(changed, dry_run, "prune done");
    Ok(())
}
