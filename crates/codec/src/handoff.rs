//! The registration contract between an implementors file and the page
//! that loads it.

use crate::error::{ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub const DEFAULT_REGISTER: &str = "register_implementors";
pub const DEFAULT_PENDING: &str = "pending_implementors";

/// Names of the two globals the generated script hands its data to.
///
/// When `window.<register>` is defined the script calls it with the mapping,
/// otherwise the mapping is parked on `window.<pending>` for the page to pick
/// up once it has loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handoff {
    register: String,
    pending: String,
}
impl Handoff {
    pub fn new(register: impl Into<String>, pending: impl Into<String>) -> Result<Self> {
        let register = register.into();
        let pending = pending.into();
        for name in [&register, &pending] {
            if !is_identifier(name) {
                exn::bail!(ErrorKind::InvalidIdentifier(name.clone()));
            }
        }
        Ok(Self { register, pending })
    }

    pub fn register(&self) -> &str {
        &self.register
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn is_default(&self) -> bool {
        self.register == DEFAULT_REGISTER && self.pending == DEFAULT_PENDING
    }

    /// The closing statement of an implementors script, handing `variable`
    /// over to the page.
    pub(crate) fn statement(&self, variable: &str) -> String {
        format!(
            "if (window.{register}) {{window.{register}({variable});}} else {{window.{pending} = {variable};}}",
            register = self.register,
            pending = self.pending,
        )
    }
}
impl Default for Handoff {
    fn default() -> Self {
        Self {
            register: DEFAULT_REGISTER.to_string(),
            pending: DEFAULT_PENDING.to_string(),
        }
    }
}
impl Display for Handoff {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "window.{} / window.{}", self.register, self.pending)
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// ASCII-only JavaScript identifier check. Unicode identifiers are legal JS
/// but rustdoc never produces them.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("register_implementors", true)]
    #[case("$pending", true)]
    #[case("_x1", true)]
    #[case("1abc", false)]
    #[case("", false)]
    #[case("has space", false)]
    #[case("dotted.name", false)]
    fn test_is_identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }

    #[test]
    fn test_default_statement() {
        let statement = Handoff::default().statement("implementors");
        assert_eq!(
            statement,
            "if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}"
        );
    }

    #[test]
    fn test_rejects_invalid_names() {
        let err = Handoff::new("ok", "not ok").unwrap_err();
        assert_eq!(&*err, &ErrorKind::InvalidIdentifier("not ok".to_string()));
        assert!(Handoff::new("register", "pending").is_ok());
    }
}
