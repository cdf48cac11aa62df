use serde::{Deserialize, Serialize};

/// A single implementor entry, exactly as rustdoc writes it.
///
/// Field order matters: it is the order the fields are serialized in, and
/// rustdoc emits `text`, `synthetic`, `types`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementorRecord {
    /// HTML fragment rendering the impl header, e.g. `impl Debug for Header`.
    pub text: String,
    /// `true` for compiler-derived impls (auto traits), `false` for
    /// impls written in source.
    pub synthetic: bool,
    /// Source-location paths of the implementing type.
    pub types: Vec<String>,
}
impl ImplementorRecord {
    pub fn new(text: impl Into<String>, synthetic: bool, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            text: text.into(),
            synthetic,
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_explicit(&self) -> bool {
        !self.synthetic
    }

    /// The first (and in practice only) type path.
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// The crate the implementing type is defined in, taken from the first
    /// segment of [`primary_type`](Self::primary_type).
    pub fn crate_name(&self) -> Option<&str> {
        self.primary_type().and_then(|path| path.split("::").next()).filter(|name| !name.is_empty())
    }
}
