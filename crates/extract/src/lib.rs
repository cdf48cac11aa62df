mod consts;
pub mod error;
mod extract;
pub mod models;
mod text;

use tracing::instrument;

use crate::error::Result;
pub use crate::extract::{Extractor, is_valid};
use crate::models::Implementor;

/// Easy, top-level entrypoint for turning the `text` of an implementor record
/// into an [`Implementor`].
///
/// The fragment is parsed leniently as HTML (entities decoded, unknown tags
/// ignored). See [`Extractor`] for more details.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract(html: &str) -> Result<Implementor> {
    Extractor::from_html(html).implementor()
}
