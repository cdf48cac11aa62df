use crate::error::{ErrorKind, Result};
use crate::layout::{self, Location};
use exn::ResultExt;
use implidx_codec::{Handoff, ImplementorsFile};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// A decoded implementors file together with where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitFile {
    /// Path relative to the doc root
    pub path: PathBuf,
    pub location: Location,
    /// The globals the file hands its data to
    pub handoff: Handoff,
    pub file: ImplementorsFile,
}
impl TraitFile {
    /// A new file for `location`, handing off through the default globals.
    pub fn new(location: Location, file: ImplementorsFile) -> Result<Self> {
        Ok(Self {
            path: location.file_path()?,
            location,
            handoff: Handoff::default(),
            file,
        })
    }

    pub fn with_handoff(mut self, handoff: Handoff) -> Self {
        self.handoff = handoff;
        self
    }

    /// Decodes `src`, working out the trait from `path`.
    pub fn decode(path: impl AsRef<Path>, src: &str) -> Result<Self> {
        let path = layout::validate_path(path)?;
        let location = layout::locate(&path)?;
        let (file, handoff) =
            ImplementorsFile::parse_with_handoff(src).or_raise(|| ErrorKind::Decode(path.clone()))?;
        Ok(Self { path, location, handoff, file })
    }

    pub fn trait_path(&self) -> &str {
        &self.location.trait_path
    }

    pub fn scope(&self) -> Option<&str> {
        self.location.scope.as_deref()
    }

    /// Reads and decodes the file at `relative` under `root`.
    #[instrument(skip_all, fields(path = %relative.as_ref().display()))]
    pub async fn read(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> Result<Self> {
        let relative = layout::validate_path(relative)?;
        let absolute = root.as_ref().join(&relative);
        let src = fs::read_to_string(&absolute).await.map_err(|e| ErrorKind::from_io(e, &relative))?;
        Self::decode(relative, &src)
    }

    /// Renders the file and writes it under `root`, creating directories as
    /// needed. Returns the absolute path written.
    #[instrument(skip_all, fields(path = %self.path.display(), records = self.file.len()))]
    pub async fn write(&self, root: impl AsRef<Path>) -> Result<PathBuf> {
        let rendered = self.file.render(&self.handoff).or_raise(|| ErrorKind::Encode(self.path.clone()))?;
        let absolute = root.as_ref().join(&self.path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        fs::write(&absolute, rendered).await.map_err(|e| ErrorKind::from_io(e, &self.path))?;
        tracing::debug!("implementors file written");
        Ok(absolute)
    }
}
