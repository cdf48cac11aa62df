//! Working with a whole tree of rustdoc implementors files: finding them,
//! indexing what they list, and checking they agree with themselves.

pub mod error;
mod index;
pub mod layout;
mod scan;
mod trait_file;
mod validate;

pub use crate::index::{CrateSummary, Entry, Filter, Index, path_matches};
pub use crate::layout::Location;
pub use crate::scan::scan;
pub use crate::trait_file::TraitFile;
pub use crate::validate::{Issue, IssueKind, Severity, validate};
