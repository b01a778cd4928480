//! codeanalysis-common - helpers shared by code analysis build tasks
//!
//! # Quick Start
//!
//! ```
//! use codeanalysis_common::{add_prop, convert_xml_str, shared_substring, Value};
//! # fn main() -> Result<(), codeanalysis_common::Error> {
//! assert_eq!(shared_substring("src/app", "src/lib"), "src/");
//!
//! let value = convert_xml_str("<Project><Rule>CA1000</Rule></Project>")?;
//! let rules = value
//!     .get("Project")
//!     .and_then(|p| p.get("Rule"))
//!     .and_then(Value::as_array)
//!     .map(|rules| rules.len());
//! assert_eq!(rules, Some(1));
//!
//! let merged = add_prop(None, "severity", "warning")?;
//! assert_eq!(merged.get("severity").and_then(Value::as_string), Some("warning"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorClass, ErrorKind, Pos, Result, Span};

pub mod strings;
pub use strings::{is_null_or_whitespace, shared_substring, sort_strings, strip_bom, trim_to_empty};

pub mod files;
pub use files::{
    directory_exists, file_exists, insert_text_to_file, prepend_text_to_file, write_file,
};

pub mod value;
pub use value::{Array, Object, Value};

pub mod xml;
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser, Writer as XmlWriter, WriterConfig as XmlWriterConfig,
};

pub mod convert;
pub use convert::{
    convert_xml_str, convert_xml_str_with_options, read_xml_file, read_xml_file_best_effort,
    read_xml_file_with_options, value_to_xml_string, write_value_as_xml_file,
    write_value_as_xml_file_with_options, BuildOptions, ParseOptions,
};

pub mod merge;
pub use merge::add_prop;

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(strip_bom(s).as_bytes());
    parser.parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}
