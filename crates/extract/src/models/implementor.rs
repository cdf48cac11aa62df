use super::{ItemKind, ItemRef};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The right-hand side of `impl Trait for …`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Target {
    /// Plain text of the type, generics included (`Foo<T>`, `&'a str`)
    pub text: String,
    /// The linked type, absent for generic parameters, references and other
    /// types rustdoc doesn't link as a whole.
    pub item: Option<ItemRef>,
}

/// A parsed implementor display fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Implementor {
    /// `unsafe impl`
    pub is_unsafe: bool,
    /// `impl !Trait for …`, which rustdoc emits for auto traits a type opts out of
    pub negative: bool,
    /// Impl generics, brackets included
    pub generics: Option<String>,
    pub trait_ref: ItemRef,
    /// Plain text of the trait, generic arguments included (`From<u8>`)
    pub trait_text: String,
    pub target: Target,
    pub where_clause: Option<String>,
    /// Whole fragment as plain text, whitespace collapsed
    pub display: String,
}
impl Implementor {
    /// The implementing type's kind, when it is linked.
    pub fn target_kind(&self) -> Option<ItemKind> {
        self.target.item.as_ref().map(|item| item.kind)
    }

    /// The implementing type's public path, when it is linked.
    pub fn target_path(&self) -> Option<&str> {
        self.target.item.as_ref().and_then(|item| item.path.as_deref())
    }
}
impl Display for Implementor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.display)
    }
}
