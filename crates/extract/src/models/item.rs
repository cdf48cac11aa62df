use super::ItemKind;

/// A hyperlinked item inside a display fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemRef {
    pub kind: ItemKind,
    /// Anchor text, e.g. `Debug`
    pub name: String,
    /// Public path from the anchor's `title`, e.g. `core::fmt::Debug`
    pub path: Option<String>,
    /// Link target, relative to the doc root or absolute for other sites
    pub href: Option<String>,
}
impl ItemRef {
    /// Links to another documentation site (usually `doc.rust-lang.org`).
    pub fn is_external(&self) -> bool {
        self.href
            .as_deref()
            .is_some_and(|href| href.starts_with("http://") || href.starts_with("https://"))
    }

    pub fn crate_name(&self) -> Option<&str> {
        self.path.as_deref().and_then(|path| path.split("::").next())
    }

    /// The path if the title carried one, the bare name otherwise.
    pub fn path_or_name(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}
