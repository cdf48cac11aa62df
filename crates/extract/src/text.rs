//! Flattening a display fragment into plain text.

use scraper::{ElementRef, Node};

/// An anchor element and where its text starts in [`Flattened::text`].
pub(crate) struct Anchor<'a> {
    pub offset: usize,
    pub element: ElementRef<'a>,
}

/// The text content of a fragment (entities decoded, `<br>` turned into a
/// space), with the position of every anchor inside it.
pub(crate) struct Flattened<'a> {
    pub text: String,
    pub anchors: Vec<Anchor<'a>>,
}

pub(crate) fn flatten(root: ElementRef<'_>) -> Flattened<'_> {
    let mut text = String::new();
    let mut anchors = Vec::new();
    for node in root.descendants() {
        match node.value() {
            Node::Text(content) => text.push_str(content),
            Node::Element(element) if element.name() == "br" => text.push(' '),
            Node::Element(element) if element.name() == "a" => {
                if let Some(element) = ElementRef::wrap(node) {
                    anchors.push(Anchor { offset: text.len(), element });
                }
            },
            _ => {},
        }
    }
    Flattened { text, anchors }
}

/// Collapses every run of whitespace (NBSP included) into a single space.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length of the balanced `<…>` group `text` starts with, brackets included.
///
/// The `>` of a `->` return arrow doesn't close anything. Returns `None`
/// when `text` doesn't start with `<` or the group never closes.
pub(crate) fn bracket_group_len(text: &str) -> Option<usize> {
    if !text.starts_with('<') {
        return None;
    }
    let mut depth = 0usize;
    let mut previous = '\0';
    for (index, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if previous != '-' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index + 1);
                }
            },
            _ => {},
        }
        previous = c;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use scraper::Html;

    #[rstest]
    #[case("<T>", Some(3))]
    #[case("<T> Debug", Some(3))]
    #[case("<T: Into<U>, U> Foo", Some(15))]
    #[case("<F: Fn() -> u8> Foo", Some(15))]
    #[case("<T", None)]
    #[case("Debug", None)]
    #[case("", None)]
    fn test_bracket_group_len(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(bracket_group_len(text), expected);
    }

    #[rstest]
    #[case("  a \t b\n\nc ", "a b c")]
    #[case("T:\u{a0}\u{a0}Sync,", "T: Sync,")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_flatten_records_anchor_offsets() {
        let fragment = Html::parse_fragment(r#"impl&lt;T&gt; <a href="x">Foo</a> for<br><a href="y">Bar</a>"#);
        let flat = flatten(fragment.root_element());
        assert_eq!(flat.text, "impl<T> Foo for Bar");
        let offsets: Vec<_> = flat.anchors.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![8, 16]);
    }
}
