//! A small token cursor over the implementors script.
//!
//! The script is generated, so a full JavaScript parser would be overkill:
//! the cursor matches the fixed tokens of the layout (tolerating whitespace
//! between them) and hands the embedded JSON literals to `serde_json`.

use crate::error::{ErrorKind, Result};
use crate::handoff::{is_identifier_continue, is_identifier_start};
use exn::ResultExt;
use serde::de::DeserializeOwned;

pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}
impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn malformed(&self, expected: &'static str) -> ErrorKind {
        ErrorKind::Malformed { offset: self.pos, expected }
    }

    /// Consumes `token` if it comes next.
    pub(crate) fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes `word` only when it is not the prefix of a longer identifier.
    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        self.skip_whitespace();
        let rest = self.rest();
        let boundary = rest.get(word.len()..).and_then(|after| after.chars().next());
        if rest.starts_with(word) && !boundary.is_some_and(is_identifier_continue) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, token: &'static str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            exn::bail!(self.malformed(token))
        }
    }

    pub(crate) fn expect_word(&mut self, word: &'static str) -> Result<()> {
        if self.eat_word(word) {
            Ok(())
        } else {
            exn::bail!(self.malformed(word))
        }
    }

    pub(crate) fn identifier(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        if !rest.chars().next().is_some_and(is_identifier_start) {
            exn::bail!(self.malformed("identifier"));
        }
        let length = rest.find(|c: char| !is_identifier_continue(c)).unwrap_or(rest.len());
        self.pos += length;
        Ok(&rest[..length])
    }

    /// Decodes one self-delimiting JSON value (string, array or object).
    pub(crate) fn json<T: DeserializeOwned>(&mut self, what: &'static str) -> Result<T> {
        self.skip_whitespace();
        let offset = self.pos;
        let mut stream = serde_json::Deserializer::from_str(self.rest()).into_iter::<T>();
        match stream.next() {
            Some(result) => {
                let value = result.or_raise(|| ErrorKind::Json { offset, what })?;
                self.pos += stream.byte_offset();
                Ok(value)
            },
            None => exn::bail!(self.malformed(what)),
        }
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos == self.src.len()
    }
}
