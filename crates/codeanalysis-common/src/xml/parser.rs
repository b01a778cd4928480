//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::scanner::Scanner;
use crate::xml::model::{Content, Declaration, Document, Element};

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new XML parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            scanner: Scanner::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let size = self.scanner.remaining_len();
        if self.config.max_size > 0 && size > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.scanner.position(),
            ));
        }

        self.scanner.skip_whitespace();
        let declaration = if self.at_declaration() {
            Some(self.parse_declaration()?)
        } else {
            None
        };

        self.skip_misc()?;
        if self.scanner.is_eof() {
            return Err(self.error_here(ErrorKind::UnexpectedEof, "missing root element"));
        }
        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.scanner.is_eof() {
            return Err(self.error_here(
                ErrorKind::UnexpectedToken,
                "unexpected content after root element",
            ));
        }

        Ok(Document { declaration, root })
    }

    fn at_declaration(&self) -> bool {
        self.scanner.at(b"<?xml")
            && matches!(self.scanner.peek_at(5), Some(b' ' | b'\t' | b'\r' | b'\n'))
    }

    fn parse_declaration(&mut self) -> Result<Declaration> {
        self.scanner.eat(b"<?xml");
        let attrs = self.parse_attributes()?;
        if !self.scanner.eat(b"?>") {
            return Err(self.error_here(ErrorKind::UnexpectedToken, "unterminated xml declaration"));
        }

        Ok(Declaration {
            version: attrs
                .get("version")
                .cloned()
                .unwrap_or_else(|| "1.0".to_string()),
            encoding: attrs.get("encoding").cloned(),
            standalone: attrs.get("standalone").map(|v| v == "yes"),
        })
    }

    /// Skip comments, processing instructions, DOCTYPE and whitespace
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.eat(b"<!--") {
                self.take_until(b"-->")?;
            } else if self.scanner.eat(b"<?") {
                self.take_until(b"?>")?;
            } else if self.scanner.eat(b"<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        let open = self.scanner.position();
        if !self.scanner.eat(b"<") {
            return Err(self.error_here(ErrorKind::UnexpectedToken, "expected '<'"));
        }

        self.depth = self.depth.saturating_add(1);
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                open,
            ));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let children = if self.scanner.eat(b"/") {
            self.expect_byte(b'>')?;
            Vec::new()
        } else {
            self.expect_byte(b'>')?;
            self.parse_content(&name, open)?
        };

        self.depth = self.depth.saturating_sub(1);
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_content(&mut self, name: &str, open: Pos) -> Result<Vec<Content>> {
        let mut children = Vec::new();
        loop {
            if self.scanner.eat(b"</") {
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(self.error_here(
                        ErrorKind::MismatchedTag {
                            expected: name.to_string(),
                            found: close_name.clone(),
                        },
                        format!("mismatched closing tag </{close_name}> for <{name}>"),
                    ));
                }
                self.scanner.skip_whitespace();
                self.expect_byte(b'>')?;
                return Ok(children);
            }

            if self.scanner.eat(b"<!--") {
                self.take_until(b"-->")?;
            } else if self.scanner.eat(b"<![CDATA[") {
                let raw = self.take_until(b"]]>")?;
                children.push(Content::CData(self.bytes_to_string(raw)?));
            } else if self.scanner.eat(b"<?") {
                self.take_until(b"?>")?;
            } else if self.scanner.at(b"<") {
                children.push(Content::Element(self.parse_element()?));
            } else if self.scanner.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnexpectedEof,
                    Span::new(open, self.scanner.position()),
                    format!("unterminated element <{name}>"),
                ));
            } else {
                children.push(Content::Text(self.parse_text()?));
            }
        }
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(b'/' | b'>' | b'?') => break,
                Some(_) => {}
                None => {
                    return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated tag"));
                }
            }

            let name = self.parse_name()?;
            self.scanner.skip_whitespace();
            self.expect_byte(b'=')?;
            self.scanner.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here(
                    ErrorKind::DuplicateAttribute { name: name.clone() },
                    format!("duplicate attribute {name:?}"),
                ));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(self.error_here(
                    ErrorKind::UnexpectedToken,
                    "expected quoted attribute value",
                ))
            }
        };
        self.scanner.bump();

        let start = self.scanner.position();
        let raw = self
            .scanner
            .take_until(&[quote])
            .ok_or_else(|| self.error_here(ErrorKind::UnexpectedEof, "unterminated attribute value"))?;
        let text = self.bytes_to_string(raw)?;
        decode_entities(&text, start)
    }

    fn parse_text(&mut self) -> Result<String> {
        let start = self.scanner.position();
        let raw = self.scanner.take_while(|b| b != b'<');
        let text = self.bytes_to_string(raw)?;
        decode_entities(&text, start)
    }

    fn parse_name(&mut self) -> Result<String> {
        match self.scanner.peek() {
            Some(first) if is_name_start(first) => {}
            Some(_) => return Err(self.error_here(ErrorKind::UnexpectedToken, "expected name")),
            None => return Err(self.error_here(ErrorKind::UnexpectedEof, "expected name")),
        }

        let raw = self.scanner.take_while(is_name_char);
        self.bytes_to_string(raw)
    }

    /// DOCTYPE bodies may nest `[...]` internal subsets
    fn skip_doctype(&mut self) -> Result<()> {
        let mut brackets = 0usize;
        while let Some(b) = self.scanner.bump() {
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated DOCTYPE"))
    }

    fn take_until(&mut self, terminator: &[u8]) -> Result<&'a [u8]> {
        self.scanner
            .take_until(terminator)
            .ok_or_else(|| self.error_here(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.scanner.eat(&[expected]) {
            Ok(())
        } else if self.scanner.is_eof() {
            Err(self.error_here(ErrorKind::UnexpectedEof, "unexpected end of input"))
        } else {
            Err(self.error_here(
                ErrorKind::UnexpectedToken,
                format!("expected '{}'", char::from(expected)),
            ))
        }
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| Error::at(ErrorKind::InvalidUtf8, self.scanner.position()))
    }

    fn error_here(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        Error::with_message(kind, Span::at(self.scanner.position()), message)
    }
}

/// Name start bytes; anything above ASCII is accepted and checked as UTF-8 later
pub(crate) fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':' | 0x80..=0xFF)
}

pub(crate) fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(Error::at(ErrorKind::InvalidEntity { entity }, pos)),
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
