//! Walking a doc root for implementors files.

use crate::error::{ErrorKind, Result};
use crate::layout;
use crate::trait_file::TraitFile;
use async_stream::stream;
use futures::Stream;
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirEntry};

enum WalkEntry {
    File(PathBuf),
    Descend(PathBuf),
    Skip,
}

fn relative_path(root: &Path, absolute: &Path) -> Result<PathBuf> {
    match absolute.strip_prefix(root) {
        Ok(relative) => layout::validate_path(relative),
        Err(_) => exn::bail!(ErrorKind::InvalidPath(absolute.to_path_buf())),
    }
}

/// Keeps `?` usable for a single directory entry; the stream loop below
/// can't propagate errors, only yield them.
async fn process_entry(root: &Path, entry: DirEntry) -> Result<WalkEntry> {
    let path = entry.path();
    let file_type = entry.file_type().await.map_err(|e| ErrorKind::from_io(e, &path))?;
    if file_type.is_dir() {
        return Ok(WalkEntry::Descend(path));
    }
    // Follow symlinks for files only, a linked directory could loop.
    let is_file = file_type.is_file()
        || (file_type.is_symlink() && fs::metadata(&path).await.is_ok_and(|metadata| metadata.is_file()));
    if !is_file {
        return Ok(WalkEntry::Skip);
    }
    let relative = relative_path(root, &path)?;
    match layout::locate(&relative) {
        Ok(_) => Ok(WalkEntry::File(relative)),
        Err(_) => Ok(WalkEntry::Skip),
    }
}

/// Streams every implementors file under `root`, decoded.
///
/// Directories are walked depth-first; files that aren't laid out like
/// implementors files (HTML pages, search indexes, …) are skipped silently.
/// A `root` that doesn't exist yields nothing. Errors on individual entries
/// or files are yielded and the walk carries on.
pub fn scan<'a>(root: &'a Path) -> impl Stream<Item = Result<TraitFile>> + 'a {
    let mut stack = vec![root.to_path_buf()];
    stream! {
        'dirs: while let Some(current) = stack.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    yield Err(exn::Exn::from(ErrorKind::from_io(err, &current)));
                    continue 'dirs;
                }
            };

            'entries: loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break 'entries,
                    Err(e) => { yield Err(exn::Exn::from(ErrorKind::from_io(e, &current))); continue 'entries; },
                };
                match process_entry(root, entry).await {
                    Ok(WalkEntry::File(relative)) => {
                        tracing::trace!(path = %relative.display(), "implementors file found");
                        yield TraitFile::read(root, relative).await;
                    },
                    Ok(WalkEntry::Descend(d)) => stack.push(d),
                    Ok(WalkEntry::Skip) => {},
                    Err(e) => yield Err(e),
                };
            }
        }
    }
}
