use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// `title="struct pkmnapi_db::header::Header"`
regex!(TITLE_REGEX, r"^\s*([a-z]+)\s+(\S+)\s*$");
// Separators between impl header parts. `\s` is Unicode-aware, so the
// non-breaking spaces rustdoc pads where-clauses with also match.
regex!(FOR_REGEX, r"\sfor\s");
regex!(WHERE_REGEX, r"\swhere\s");
regex!(IMPL_REGEX, r"^\s*(unsafe\s+)?impl\b");
