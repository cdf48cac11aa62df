pub mod error;
mod file;
mod handoff;
mod parse;
mod record;

pub use crate::file::{ImplementorsFile, MergePolicy};
pub use crate::handoff::{DEFAULT_PENDING, DEFAULT_REGISTER, Handoff, is_identifier};
pub use crate::record::ImplementorRecord;
