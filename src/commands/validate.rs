use super::{Context, line, load_tree};
use crate::error::Result;
use implidx_index::Severity;
use std::io::Write;
use tracing::instrument;

/// Prints every issue at or above `min_severity`, followed by a tally.
/// Files that could not be decoded count as errors. Returns the number of
/// errors, which are counted whatever `min_severity` is.
#[instrument(skip(context, out))]
pub async fn validate(context: &Context, min_severity: Severity, out: &mut impl Write) -> Result<usize> {
    let tree = load_tree(context).await;
    let mut counts = [0usize; 3];
    for failure in &tree.failures {
        counts[Severity::Error as usize] += 1;
        line(out, format_args!("{}: {}", Severity::Error, &**failure))?;
    }
    for issue in tree.files.iter().flat_map(implidx_index::validate) {
        counts[issue.severity() as usize] += 1;
        if issue.severity() >= min_severity {
            line(out, format_args!("{issue}"))?;
        }
    }
    let [info, warnings, errors] = counts;
    line(
        out,
        format_args!("{} files: {errors} errors, {warnings} warnings, {info} info", tree.files.len() + tree.failures.len()),
    )?;
    Ok(errors)
}
