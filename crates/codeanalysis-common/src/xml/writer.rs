//! XML text writer

use crate::error::{Error, ErrorKind, Result};
use crate::xml::model::{Content, Declaration, Document, Element};
use crate::xml::parser::{is_name_char, is_name_start};

/// Output layout for the writer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Put every element on its own indented line
    pub pretty: bool,
    /// Indentation unit used when `pretty` is set
    pub indent: String,
    /// Line terminator used when `pretty` is set
    pub newline: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            newline: "\n".to_string(),
        }
    }
}

impl WriterConfig {
    /// Single-line output with no indentation
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}

/// Renders a [`Document`] to text
#[derive(Debug, Default)]
pub struct Writer {
    config: WriterConfig,
    output: String,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    /// Render the document, consuming the writer
    pub fn write_document(mut self, doc: &Document) -> Result<String> {
        if let Some(declaration) = &doc.declaration {
            self.write_declaration(declaration);
            self.end_line();
        }
        self.write_element(&doc.root, 0)?;

        if self.config.pretty && self.output.ends_with(&self.config.newline) {
            let len = self.output.len() - self.config.newline.len();
            self.output.truncate(len);
        }
        Ok(self.output)
    }

    fn write_declaration(&mut self, declaration: &Declaration) {
        self.output.push_str("<?xml version=\"");
        self.output.push_str(&escape_attribute(&declaration.version));
        self.output.push('"');
        if let Some(encoding) = &declaration.encoding {
            self.output.push_str(" encoding=\"");
            self.output.push_str(&escape_attribute(encoding));
            self.output.push('"');
        }
        if let Some(standalone) = declaration.standalone {
            self.output.push_str(" standalone=\"");
            self.output.push_str(if standalone { "yes" } else { "no" });
            self.output.push('"');
        }
        self.output.push_str("?>");
    }

    fn write_element(&mut self, element: &Element, depth: usize) -> Result<()> {
        self.write_indent(depth);
        self.write_element_inline(element, Some(depth))?;
        self.end_line();
        Ok(())
    }

    /// Writes `element` without a leading indent or trailing newline.
    ///
    /// `depth` is `None` inside mixed content, where any added whitespace
    /// would become part of the text.
    fn write_element_inline(&mut self, element: &Element, depth: Option<usize>) -> Result<()> {
        validate_name(&element.name)?;
        self.output.push('<');
        self.output.push_str(&element.name);

        for (key, value) in &element.attributes {
            validate_name(key)?;
            self.output.push(' ');
            self.output.push_str(key);
            self.output.push_str("=\"");
            self.output.push_str(&escape_attribute(value));
            self.output.push('"');
        }

        if element
            .children
            .iter()
            .all(|child| matches!(child, Content::Text(text) if text.is_empty()))
        {
            self.output.push_str("/>");
            return Ok(());
        }

        self.output.push('>');
        let has_char_data = element.children.iter().any(|child| match child {
            Content::Text(text) => !text.is_empty(),
            Content::CData(_) => true,
            Content::Element(_) => false,
        });
        match depth {
            Some(depth) if self.config.pretty && !has_char_data => {
                self.end_line();
                for child in element.elements() {
                    self.write_element(child, depth + 1)?;
                }
                self.write_indent(depth);
            }
            _ => {
                for child in &element.children {
                    match child {
                        Content::Element(child) => self.write_element_inline(child, None)?,
                        Content::Text(text) => self.output.push_str(&escape_text(text)),
                        Content::CData(text) => self.write_cdata(text),
                    }
                }
            }
        }

        self.output.push_str("</");
        self.output.push_str(&element.name);
        self.output.push('>');
        Ok(())
    }

    fn write_cdata(&mut self, text: &str) {
        self.output.push_str("<![CDATA[");
        self.output.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
        self.output.push_str("]]>");
    }

    fn write_indent(&mut self, depth: usize) {
        if self.config.pretty {
            for _ in 0..depth {
                self.output.push_str(&self.config.indent);
            }
        }
    }

    fn end_line(&mut self) {
        if self.config.pretty {
            self.output.push_str(&self.config.newline);
        }
    }
}

/// Check that `name` can be used as an element or attribute name
pub fn validate_name(name: &str) -> Result<()> {
    let mut bytes = name.bytes();
    let valid = bytes.next().is_some_and(is_name_start) && bytes.all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidName {
            name: name.to_string(),
        }))
    }
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attribute(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}
