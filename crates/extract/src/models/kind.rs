use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::{Error, ErrorKind};

/// The kind of item an anchor in a display fragment links to, as encoded in
/// the anchor's CSS class (and in the first word of its `title`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum ItemKind {
    Trait,
    Struct,
    Enum,
    Union,
    Primitive,
    /// `type` aliases
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    TypeAlias,
    /// `extern { type T; }`
    ForeignType,
    TraitAlias,
}
impl ItemKind {
    /// Returns the class name rustdoc uses for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trait => "trait",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Primitive => "primitive",
            Self::TypeAlias => "type",
            Self::ForeignType => "foreigntype",
            Self::TraitAlias => "traitalias",
        }
    }

    /// `true` for kinds that can stand on the right-hand side of `for`.
    pub fn is_type(&self) -> bool {
        !matches!(self, Self::Trait | Self::TraitAlias)
    }
}
impl FromStr for ItemKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "trait" => Self::Trait,
            "struct" => Self::Struct,
            "enum" => Self::Enum,
            "union" => Self::Union,
            "primitive" => Self::Primitive,
            "type" => Self::TypeAlias,
            "foreigntype" => Self::ForeignType,
            "traitalias" => Self::TraitAlias,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "kind",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
