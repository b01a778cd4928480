//! Markup scanner used by the XML parser

use crate::error::Pos;

/// Forward-only view over the input that keeps line and column current
#[derive(Clone, Debug)]
pub(crate) struct Scanner<'a> {
    input: &'a [u8],
    offset: usize,
    line: u32,
    col: u32,
}

impl<'a> Scanner<'a> {
    pub(crate) const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    fn rest(&self) -> &'a [u8] {
        self.input.get(self.offset..).unwrap_or_default()
    }

    /// Moves past `len` bytes (clamped to the input) and returns them
    fn consume(&mut self, len: usize) -> &'a [u8] {
        let rest = self.rest();
        let (taken, _) = rest.split_at(len.min(rest.len()));
        for &b in taken {
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.offset += taken.len();
        taken
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    pub(crate) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.rest().get(ahead).copied()
    }

    pub(crate) fn at(&self, markup: &[u8]) -> bool {
        self.rest().starts_with(markup)
    }

    /// Consumes `markup` if the input continues with it
    pub(crate) fn eat(&mut self, markup: &[u8]) -> bool {
        let found = self.at(markup);
        if found {
            self.consume(markup.len());
        }
        found
    }

    pub(crate) fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.consume(1);
        Some(b)
    }

    pub(crate) fn take_while(&mut self, mut keep: impl FnMut(u8) -> bool) -> &'a [u8] {
        let rest = self.rest();
        let len = rest.iter().position(|&b| !keep(b)).unwrap_or(rest.len());
        self.consume(len)
    }

    /// Returns the bytes before `terminator` and consumes the terminator too.
    ///
    /// When the terminator never appears the rest of the input is consumed and
    /// `None` comes back.
    pub(crate) fn take_until(&mut self, terminator: &[u8]) -> Option<&'a [u8]> {
        let rest = self.rest();
        match rest
            .windows(terminator.len().max(1))
            .position(|window| window == terminator)
        {
            Some(len) => {
                let body = self.consume(len);
                self.consume(terminator.len());
                Some(body)
            }
            None => {
                self.consume(rest.len());
                None
            }
        }
    }

    pub(crate) fn skip_whitespace(&mut self) {
        self.take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }

    pub(crate) const fn position(&self) -> Pos {
        Pos::new(self.offset, self.line, self.col)
    }

    pub(crate) const fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    pub(crate) fn remaining_len(&self) -> usize {
        self.rest().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eat_only_matching_markup() {
        let mut scanner = Scanner::new(b"<!-- x -->");
        assert!(!scanner.eat(b"<?"));
        assert!(scanner.eat(b"<!--"));
        assert_eq!(scanner.peek(), Some(b' '));
        assert_eq!(scanner.position().col, 5);
    }

    #[test]
    fn test_take_until_consumes_terminator() {
        let mut scanner = Scanner::new(b"a]]b]]>tail");
        assert_eq!(scanner.take_until(b"]]>"), Some(b"a]]b".as_slice()));
        assert!(scanner.at(b"tail"));
    }

    #[test]
    fn test_take_until_missing_terminator_drains_input() {
        let mut scanner = Scanner::new(b"no end\nhere");
        assert_eq!(scanner.take_until(b"-->"), None);
        assert!(scanner.is_eof());
        assert_eq!(scanner.position().line, 2);
        assert_eq!(scanner.bump(), None);
    }

    #[test]
    fn test_take_while_and_whitespace_track_lines() {
        let mut scanner = Scanner::new(b"name=\n\t  value");
        assert_eq!(scanner.take_while(|b| b.is_ascii_alphabetic()), b"name");
        assert_eq!(scanner.bump(), Some(b'='));
        scanner.skip_whitespace();
        assert_eq!(scanner.peek_at(1), Some(b'a'));
        let pos = scanner.position();
        assert_eq!((pos.line, pos.col, pos.offset), (2, 4, 9));
        assert_eq!(scanner.remaining_len(), 5);
    }
}
