//! XML <-> value conversion
//!
//! The mapping follows the conventions task scripts already expect from their
//! XML files:
//!
//! - the root element is kept as the single key of the top-level object,
//! - attributes live under `"$"` and text under `"_"`,
//! - child elements are always collected into arrays,
//! - an element holding only text collapses to that string.
//!
//! Building goes the other way and accepts the same shape.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::files::write_file;
use crate::strings::strip_bom;
use crate::value::{Array, Object, Value};
use crate::xml::{Config, Content, Declaration, Document, Element, Parser, Writer, WriterConfig};

/// Root element name used when the value does not name one itself
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Escaped carriage return removed from generated files
const CR_ESCAPE: &str = "&#xD;";

/// Options for turning XML into a [`Value`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Parser limits
    pub config: Config,
    /// Key holding an element's attributes
    pub attr_key: String,
    /// Key holding an element's text when it also has attributes or children
    pub char_key: String,
    /// Always wrap child elements in arrays, even when they occur once
    pub explicit_array: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            config: Config::default(),
            attr_key: "$".to_string(),
            char_key: "_".to_string(),
            explicit_array: true,
        }
    }
}

/// Options for turning a [`Value`] into XML
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub root_name: String,
    pub attr_key: String,
    pub char_key: String,
    /// Omit the `<?xml ...?>` declaration
    pub headless: bool,
    pub writer: WriterConfig,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            attr_key: "$".to_string(),
            char_key: "_".to_string(),
            headless: false,
            writer: WriterConfig::default(),
        }
    }
}

/// Parse an XML string into a value
pub fn convert_xml_str(xml: &str) -> Result<Value> {
    convert_xml_str_with_options(xml, &ParseOptions::default())
}

/// Parse an XML string into a value with custom options
pub fn convert_xml_str_with_options(xml: &str, options: &ParseOptions) -> Result<Value> {
    debug!("Converting XML to JSON");
    let xml = strip_bom(xml);
    let mut parser = Parser::with_config(xml.as_bytes(), options.config);
    let doc = parser.parse()?;
    Ok(document_to_value(&doc, options))
}

/// Read and parse the XML file at `path`.
///
/// Failures are classified: a missing file, an unreadable file and malformed
/// content each map to a distinct [`crate::ErrorClass`].
pub fn read_xml_file(path: impl AsRef<Path>) -> Result<Value> {
    read_xml_file_with_options(path, &ParseOptions::default())
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_xml_file_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Value> {
    let path = path.as_ref();
    debug!("Reading XML file");

    let bytes = fs::read(path).map_err(|e| Error::io(&e, path))?;
    let text =
        String::from_utf8(bytes).map_err(|_| Error::new(ErrorKind::InvalidUtf8).with_path(path))?;
    convert_xml_str_with_options(&text, options).map_err(|e| e.with_path(path))
}

/// Read the XML file at `path`, logging and discarding any failure
pub fn read_xml_file_best_effort(path: impl AsRef<Path>) -> Option<Value> {
    match read_xml_file(path) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(class = ?err.class(), "Error when reading xml file: {err}");
            None
        }
    }
}

/// Serialize `value` as XML and write it to `path`.
///
/// Escaped carriage returns (`&#xD;`) are dropped from the output so files
/// produced on Windows do not pick up literal escapes.
pub fn write_value_as_xml_file(path: impl AsRef<Path>, value: &Value) -> Result<()> {
    write_value_as_xml_file_with_options(path, value, &BuildOptions::default())
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_value_as_xml_file_with_options(
    path: impl AsRef<Path>,
    value: &Value,
    options: &BuildOptions,
) -> Result<()> {
    debug!("Writing JSON as XML file");
    let xml = value_to_xml_string(value, options)?.replace(CR_ESCAPE, "");
    write_file(path, &xml)
}

/// Serialize `value` as XML text
pub fn value_to_xml_string(value: &Value, options: &BuildOptions) -> Result<String> {
    let doc = value_to_document(value, options);
    Writer::with_config(options.writer.clone()).write_document(&doc)
}

/// Map a parsed document to a value
pub fn document_to_value(doc: &Document, options: &ParseOptions) -> Value {
    let mut root = Object::new();
    root.insert(doc.root.name.as_str(), element_to_value(&doc.root, options));
    Value::Object(root)
}

fn element_to_value(element: &Element, options: &ParseOptions) -> Value {
    let mut obj = Object::new();

    if !element.attributes.is_empty() {
        let attrs: Object = element
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        obj.insert(options.attr_key.as_str(), attrs);
    }

    let mut text = String::new();
    let mut has_cdata = false;
    for child in &element.children {
        match child {
            Content::Text(value) => text.push_str(value),
            Content::CData(value) => {
                text.push_str(value);
                has_cdata = true;
            }
            Content::Element(_) => {}
        }
    }

    // Text-only and empty elements collapse to a string; blank text survives
    // only here.
    if obj.is_empty() && element.elements().next().is_none() {
        return Value::String(text);
    }
    if has_cdata || !text.trim().is_empty() {
        obj.insert(options.char_key.as_str(), text);
    }

    for child in element.elements() {
        let value = element_to_value(child, options);
        match obj.get_mut(&child.name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(Array::from(vec![first, value]));
            }
            None if options.explicit_array => {
                obj.insert(child.name.as_str(), Array::from(vec![value]));
            }
            None => {
                obj.insert(child.name.as_str(), value);
            }
        }
    }

    Value::Object(obj)
}

/// Map a value to a document
pub fn value_to_document(value: &Value, options: &BuildOptions) -> Document {
    let named_root = match value {
        Value::Object(obj) if obj.len() == 1 && options.root_name == DEFAULT_ROOT_NAME => {
            obj.first()
        }
        _ => None,
    };
    let (name, body) = match named_root {
        Some((name, body)) => (name.as_str(), body),
        None => (options.root_name.as_str(), value),
    };

    let mut root = Element::new(name);
    render(&mut root, body, options);
    Document {
        declaration: (!options.headless).then(Declaration::default),
        root,
    }
}

fn render(element: &mut Element, value: &Value, options: &BuildOptions) {
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(obj) => {
                        for (key, entry) in obj {
                            push_child(element, key, entry, options);
                        }
                    }
                    other => render(element, other, options),
                }
            }
        }
        Value::Object(obj) => {
            for (key, child) in obj {
                if *key == options.attr_key {
                    render_attributes(element, child);
                } else if *key == options.char_key {
                    render(element, child, options);
                } else if let Value::Array(entries) = child {
                    for entry in entries {
                        push_child(element, key, entry, options);
                    }
                } else {
                    push_child(element, key, child, options);
                }
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar).filter(|text| !text.is_empty()) {
                element.children.push(Content::Text(text));
            }
        }
    }
}

fn render_attributes(element: &mut Element, attrs: &Value) {
    let Value::Object(attrs) = attrs else {
        debug!("Ignoring attribute value that is not an object");
        return;
    };
    for (name, value) in attrs {
        match scalar_text(value) {
            Some(text) => {
                element.attributes.insert(name.clone(), text);
            }
            None => debug!("Skipping attribute {name} without a scalar value"),
        }
    }
}

fn push_child(element: &mut Element, name: &str, value: &Value, options: &BuildOptions) {
    let mut child = Element::new(name);
    render(&mut child, value, options);
    element.children.push(Content::Element(child));
}

/// Text for a scalar; `None` for null and containers
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(format_number(*n)),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
