//! Where rustdoc puts implementor files, and which trait a file is for.
//!
//! Relative to the doc root, a file lives at
//! `[<scope>/]implementors/<module>/…/trait.<Name>.js` and documents the
//! trait `<module>::…::<Name>`. The optional scope is the per-crate doc
//! directory some rustdoc versions nest the tree under.

use crate::error::{ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Component, Path, PathBuf};

const IMPLEMENTORS_DIR: &str = "implementors";
const FILE_PREFIX: &str = "trait.";
const FILE_SUFFIX: &str = ".js";

/// The trait (and scope) an implementors file documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Location {
    pub scope: Option<String>,
    pub trait_path: String,
}
impl Location {
    pub fn new(scope: Option<impl Into<String>>, trait_path: impl Into<String>) -> Self {
        Self {
            scope: scope.map(Into::into),
            trait_path: trait_path.into(),
        }
    }

    /// The path of this location's file, relative to the doc root.
    pub fn file_path(&self) -> Result<PathBuf> {
        file_path(self.scope.as_deref(), &self.trait_path)
    }

    /// Final segment of the trait path.
    pub fn trait_name(&self) -> &str {
        self.trait_path.rsplit("::").next().unwrap_or(&self.trait_path)
    }
}
impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.scope {
            Some(scope) => write!(f, "{} ({})", self.trait_path, scope),
            None => write!(f, "{}", self.trait_path),
        }
    }
}

/// Normalizes a path relative to the doc root, so that two spellings of one
/// implementors file compare equal and `..` can't reach outside the root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use implidx_index::layout::validate_path;
/// assert_eq!(
///     validate_path("pkmnapi_sql/./implementors/core/marker/../marker/trait.Sync.js").unwrap(),
///     Path::new("pkmnapi_sql/implementors/core/marker/trait.Sync.js")
/// );
/// assert!(validate_path("implementors/../../std/implementors/core/trait.Copy.js").is_err());
/// ```
pub fn validate_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir => {},
            // rustdoc never writes a NUL into a module or trait name.
            Component::Normal(segment) if segment.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(segment) => normalized.push(segment),
            // Nothing left to pop means the path climbs above the doc root.
            Component::ParentDir if !normalized.pop() => exn::bail!(invalid()),
            Component::ParentDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
        }
    }
    match normalized.as_os_str().is_empty() {
        true => exn::bail!(invalid()),
        false => Ok(normalized),
    }
}

/// Works out which trait a doc-root-relative path documents.
pub fn locate(path: impl AsRef<Path>) -> Result<Location> {
    let path = validate_path(path)?;
    let not_ours = || ErrorKind::NotAnImplementorsFile(path.clone());
    let mut segments = Vec::new();
    for component in path.components() {
        match component.as_os_str().to_str() {
            Some(segment) => segments.push(segment),
            None => exn::bail!(not_ours()),
        }
    }

    let Some(marker) = segments.iter().position(|segment| *segment == IMPLEMENTORS_DIR) else {
        exn::bail!(not_ours());
    };
    let scope = match marker {
        0 => None,
        1 => Some(segments[0].to_string()),
        _ => exn::bail!(not_ours()),
    };
    let Some((file_name, modules)) = segments[marker + 1..].split_last() else {
        exn::bail!(not_ours());
    };
    let trait_name = file_name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
        .filter(|name| is_segment(name))
        .ok_or_else(not_ours)?;
    if modules.is_empty() || !modules.iter().all(|module| is_segment(module)) {
        exn::bail!(not_ours());
    }

    let mut trait_path = modules.join("::");
    trait_path.push_str("::");
    trait_path.push_str(trait_name);
    Ok(Location { scope, trait_path })
}

/// The inverse of [`locate`].
pub fn file_path(scope: Option<&str>, trait_path: &str) -> Result<PathBuf> {
    let segments: Vec<&str> = trait_path.split("::").collect();
    let Some((trait_name, modules)) = segments.split_last() else {
        exn::bail!(ErrorKind::InvalidTraitPath(trait_path.to_string()));
    };
    if modules.is_empty() || !segments.iter().all(|segment| is_segment(segment)) {
        exn::bail!(ErrorKind::InvalidTraitPath(trait_path.to_string()));
    }
    let mut path = PathBuf::new();
    if let Some(scope) = scope {
        if !is_segment(scope) {
            exn::bail!(ErrorKind::InvalidPath(PathBuf::from(scope)));
        }
        path.push(scope);
    }
    path.push(IMPLEMENTORS_DIR);
    path.extend(modules);
    path.push(format!("{FILE_PREFIX}{trait_name}{FILE_SUFFIX}"));
    Ok(path)
}

/// A Rust path segment as it appears in file names: non-empty, no
/// separators, no dots.
fn is_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
}
