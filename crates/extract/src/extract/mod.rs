//! Main extraction logic for implementor display fragments.

use crate::consts;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Implementor, ItemKind, ItemRef, Target};
use crate::text::{self, Anchor, bracket_group_len, normalize};
use exn::{OptionExt, ResultExt};
use scraper::{ElementRef, Html};
use std::convert::Infallible;
use std::str::FromStr;
use tracing::instrument;

#[derive(Debug)]
pub struct Extractor {
    fragment: Html,
}
impl Extractor {
    pub fn from_fragment(fragment: Html) -> Self {
        Self { fragment }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_fragment(Html::parse_fragment(html))
    }

    /// `true` when the fragment parses as an impl header. Only useful if you
    /// don't plan on extracting the [`Implementor`].
    pub fn is_valid(&self) -> bool {
        self.implementor().is_ok()
    }

    /// Splits the impl header into its parts.
    ///
    /// The fragment is flattened to text first; the trait is the first
    /// trait anchor after the impl generics, and the target is linked only
    /// when an anchor starts exactly where the type after `for` starts (so
    /// `&'a Foo` or `T` stay unlinked).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The text doesn't start with `impl` (or `unsafe impl`)
    /// - There is no `for`, or no trait anchor before it
    /// - An anchor's `title` can't be parsed
    #[instrument(level = "trace", skip(self))]
    pub fn implementor(&self) -> Result<Implementor> {
        let flat = text::flatten(self.fragment.root_element());
        let source = flat.text.as_str();

        let header = consts::IMPL_REGEX.captures(source).ok_or_raise(|| ErrorKind::NotAnImpl)?;
        let is_unsafe = header.get(1).is_some();
        let mut position = header.get(0).map(|m| m.end()).unwrap_or_default();

        // impl<…>
        let rest = &source[position..];
        let rest_trimmed = rest.trim_start();
        position += rest.len() - rest_trimmed.len();
        let generics = match bracket_group_len(rest_trimmed) {
            Some(length) => {
                position += length;
                Some(normalize(&rest_trimmed[..length]))
            },
            None if rest_trimmed.starts_with('<') => exn::bail!(ErrorKind::ParseError {
                field: "generics",
                value: rest_trimmed.to_string(),
            }),
            None => None,
        };

        // !Trait
        let rest = &source[position..];
        let rest_trimmed = rest.trim_start();
        position += rest.len() - rest_trimmed.len();
        let negative = rest_trimmed.starts_with('!');
        if negative {
            position += '!'.len_utf8();
        }
        let trait_start = position;

        let separator = consts::FOR_REGEX
            .find_at(source, trait_start)
            .ok_or_raise(|| ErrorKind::MissingField("target"))?;
        let trait_anchor = flat
            .anchors
            .iter()
            .filter(|anchor| (trait_start..separator.start()).contains(&anchor.offset))
            .find(|anchor| Self::classified(anchor).is_some_and(|kind| !kind.is_type()))
            .ok_or_raise(|| ErrorKind::MissingField("trait"))?;
        let trait_ref = Self::item(trait_anchor)?;

        let where_match = consts::WHERE_REGEX.find_at(source, separator.end());
        let target_end = where_match.map(|m| m.start()).unwrap_or(source.len());
        let target_source = &source[separator.end()..target_end];
        let target_start = separator.end() + (target_source.len() - target_source.trim_start().len());
        let target_item = flat
            .anchors
            .iter()
            .find(|anchor| anchor.offset == target_start)
            .filter(|anchor| Self::classified(anchor).is_some_and(|kind| kind.is_type()))
            .map(Self::item)
            .transpose()?;

        Ok(Implementor {
            is_unsafe,
            negative,
            generics,
            trait_ref,
            trait_text: normalize(&source[trait_start..separator.start()]),
            target: Target {
                text: normalize(target_source),
                item: target_item,
            },
            where_clause: where_match
                .map(|m| normalize(&source[m.end()..]).trim_end_matches(',').to_string())
                .filter(|clause| !clause.is_empty()),
            display: normalize(source),
        })
    }

    /// The kind an anchor's class marks it as, falling back to the first
    /// word of its `title`.
    fn classified(anchor: &Anchor<'_>) -> Option<ItemKind> {
        let element = anchor.element.value();
        element.classes().find_map(|class| class.parse::<ItemKind>().ok()).or_else(|| {
            element
                .attr("title")
                .and_then(|title| title.split_whitespace().next())
                .and_then(|kind| kind.parse::<ItemKind>().ok())
        })
    }

    fn item(anchor: &Anchor<'_>) -> Result<ItemRef> {
        let element: &ElementRef<'_> = &anchor.element;
        let title = match element.value().attr("title") {
            Some(title) => Some(Self::title(title)?),
            None => None,
        };
        let kind = match (Self::classified(anchor), &title) {
            (Some(kind), _) => kind,
            (None, Some((kind, _))) => *kind,
            (None, None) => exn::bail!(ErrorKind::MissingField("kind")),
        };
        Ok(ItemRef {
            kind,
            name: normalize(&element.text().collect::<String>()),
            path: title.map(|(_, path)| path),
            href: element.value().attr("href").map(str::to_string),
        })
    }

    /// Splits `"struct pkmnapi_db::header::Header"` into its kind and path.
    fn title(title: &str) -> Result<(ItemKind, String)> {
        let captures = consts::TITLE_REGEX.captures(title).ok_or_raise(|| ErrorKind::ParseError {
            field: "title",
            value: title.to_string(),
        })?;
        let (_, [kind, path]) = captures.extract();
        let kind = kind.parse::<ItemKind>().or_raise(|| ErrorKind::ParseError {
            field: "title",
            value: title.to_string(),
        })?;
        Ok((kind, path.to_string()))
    }
}
impl FromStr for Extractor {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<Html> for Extractor {
    fn from(fragment: Html) -> Self {
        Self::from_fragment(fragment)
    }
}

impl TryFrom<Extractor> for Implementor {
    type Error = Error;
    fn try_from(extractor: Extractor) -> Result<Self> {
        extractor.implementor()
    }
}

/// Returns `true` if the fragment appears to be an implementor display string.
///
/// # Examples
///
/// ```rust
/// use implidx_extract::is_valid;
/// let text = concat!(
///     r#"impl <a class="trait" href="https://doc.rust-lang.org/nightly/core/fmt/trait.Debug.html" "#,
///     r#"title="trait core::fmt::Debug">Debug</a> for "#,
///     r#"<a class="struct" href="pkmnapi_db/header/struct.Header.html" "#,
///     r#"title="struct pkmnapi_db::header::Header">Header</a>"#,
/// );
///
/// assert!(is_valid(text));
/// assert!(!is_valid("<p>not an impl</p>"));
/// ```
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn is_valid(html: &str) -> bool {
    Extractor::from_html(html).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn anchor(kind: &str, path: &str, name: &str) -> String {
        format!(r#"<a class="{kind}" href="{name}.html" title="{kind} {path}">{name}</a>"#)
    }

    fn extract(html: &str) -> Implementor {
        Extractor::from_html(html).implementor().unwrap()
    }

    #[test]
    fn test_plain_impl() {
        let html = format!(
            "impl {} for {}",
            anchor("trait", "core::fmt::Debug", "Debug"),
            anchor("enum", "pkmnapi_db::header::CGBFlag", "CGBFlag")
        );
        let implementor = extract(&html);
        assert!(!implementor.is_unsafe);
        assert!(!implementor.negative);
        assert_eq!(implementor.generics, None);
        assert_eq!(implementor.trait_ref.path.as_deref(), Some("core::fmt::Debug"));
        assert_eq!(implementor.trait_ref.kind, ItemKind::Trait);
        assert_eq!(implementor.trait_text, "Debug");
        assert_eq!(implementor.target.text, "CGBFlag");
        assert_eq!(implementor.target_kind(), Some(ItemKind::Enum));
        assert_eq!(implementor.target_path(), Some("pkmnapi_db::header::CGBFlag"));
        assert_eq!(implementor.where_clause, None);
        assert_eq!(implementor.display, "impl Debug for CGBFlag");
    }

    #[test]
    fn test_generic_impl_with_bound_and_where_clause() {
        // The bound's trait anchor comes first; the implemented trait is the
        // one after the generics.
        let html = format!(
            "impl&lt;T: {}&gt; {} for {}&lt;T&gt; <span class=\"where fmt-newline\">where<br>&nbsp;&nbsp;&nbsp;&nbsp;T: {},&nbsp;</span>",
            anchor("trait", "core::clone::Clone", "Clone"),
            anchor("trait", "core::marker::Sync", "Sync"),
            anchor("struct", "demo::Wrapper", "Wrapper"),
            anchor("trait", "core::marker::Sync", "Sync"),
        );
        let implementor = extract(&html);
        assert_eq!(implementor.generics.as_deref(), Some("<T: Clone>"));
        assert_eq!(implementor.trait_ref.name, "Sync");
        assert_eq!(implementor.target.text, "Wrapper<T>");
        assert_eq!(implementor.target_path(), Some("demo::Wrapper"));
        assert_eq!(implementor.where_clause.as_deref(), Some("T: Sync"));
    }

    #[test]
    fn test_negative_synthetic_impl() {
        let html = format!(
            "impl !{} for {}",
            anchor("trait", "core::marker::Send", "Send"),
            anchor("struct", "demo::Handle", "Handle")
        );
        let implementor = extract(&html);
        assert!(implementor.negative);
        assert_eq!(implementor.trait_text, "Send");
    }

    #[test]
    fn test_unsafe_impl() {
        let html = format!(
            "unsafe impl {} for {}",
            anchor("trait", "core::marker::Sync", "Sync"),
            anchor("struct", "demo::Pool", "Pool")
        );
        assert!(extract(&html).is_unsafe);
    }

    #[rstest]
    #[case::reference("&amp;'a ", "&'a Bytes")]
    #[case::generic_param("", "Bytes")]
    fn test_unlinked_targets(#[case] prefix: &str, #[case] expected: &str) {
        let target = if prefix.is_empty() {
            "Bytes".to_string()
        } else {
            format!("{prefix}{}", anchor("struct", "demo::Bytes", "Bytes"))
        };
        let html = format!("impl&lt;'a&gt; {} for {target}", anchor("trait", "core::convert::From", "From"));
        let implementor = extract(&html);
        assert_eq!(implementor.target.text, expected);
        assert_eq!(implementor.target.item, None);
    }

    #[test]
    fn test_trait_with_arguments() {
        let html = format!(
            "impl {}&lt;{}&gt; for {}",
            anchor("trait", "core::convert::From", "From"),
            anchor("primitive", "u8", "u8"),
            anchor("enum", "demo::Code", "Code"),
        );
        let implementor = extract(&html);
        assert_eq!(implementor.trait_text, "From<u8>");
        assert_eq!(implementor.trait_ref.name, "From");
        assert_eq!(implementor.target_kind(), Some(ItemKind::Enum));
    }

    #[test]
    fn test_kind_from_title_without_class() {
        let html = format!(
            r#"impl {} for <a href="x.html" title="union demo::Raw">Raw</a>"#,
            anchor("trait", "core::marker::Copy", "Copy")
        );
        assert_eq!(extract(&html).target_kind(), Some(ItemKind::Union));
    }

    #[rstest]
    #[case::not_impl("<p>Hello</p>", ErrorKind::NotAnImpl)]
    #[case::no_for(r#"impl <a class="trait" title="trait a::B">B</a>"#, ErrorKind::MissingField("target"))]
    #[case::no_trait(r#"impl B for <a class="struct" title="struct a::C">C</a>"#, ErrorKind::MissingField("trait"))]
    #[case::bad_title(
        r#"impl <a class="trait" title="nonsense">B</a> for C"#,
        ErrorKind::ParseError { field: "title", value: "nonsense".to_string() }
    )]
    fn test_errors(#[case] html: &str, #[case] expected: ErrorKind) {
        let err = Extractor::from_html(html).implementor().unwrap_err();
        assert_eq!(&*err, &expected);
    }
}
