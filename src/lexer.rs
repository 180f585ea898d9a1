//! A module implementing lexical splitting of a command line into
//! delimiter-separated tokens.

/// Delimiter set used for argument splitting: spaces and tabs.
pub const WHITESPACE: &str = " \t";

/// A restartable tokenizer over a borrowed line buffer.
///
/// The tokenizer holds the unconsumed remainder of the buffer as its cursor.
/// Each call to [`Tokenizer::next_token`] skips leading delimiters, returns
/// the next maximal run of non-delimiter characters, and steps past the
/// delimiter that terminated it. Returned tokens are subslices of the
/// original buffer, so the buffer must outlive every token cut from it;
/// the borrow checker enforces this.
///
/// Starting a scan over a new buffer means constructing a new `Tokenizer`;
/// there is no shared scan state between instances.
pub struct Tokenizer<'a> {
    rest: &'a str,
    delimiters: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Start a new scan over `buf`, splitting on any character in
    /// `delimiters`.
    pub fn new(buf: &'a str, delimiters: &'a str) -> Self {
        Tokenizer { rest: buf, delimiters }
    }

    /// Start a new scan over `buf`, splitting on [`WHITESPACE`].
    pub fn whitespace(buf: &'a str) -> Self {
        Tokenizer::new(buf, WHITESPACE)
    }

    /// Return the next token, or `None` once only delimiters (or nothing)
    /// remain in the buffer.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let delimiters = self.delimiters;
        let rest = self.rest.trim_start_matches(|c| delimiters.contains(c));
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }
        let end = rest
            .find(|c| delimiters.contains(c))
            .unwrap_or(rest.len());
        let token = &rest[..end];
        let tail = &rest[end..];
        // Consume the delimiter terminating the token, when there is one.
        self.rest = tail
            .strip_prefix(|c: char| delimiters.contains(c))
            .unwrap_or(tail);
        Some(token)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.next_token()
    }
}
