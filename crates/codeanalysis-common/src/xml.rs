//! XML document model, parser and writer

pub mod model;
pub mod parser;
mod scanner;
pub mod writer;

pub use model::{Content, Declaration, Document, Element};
pub use parser::{Config, Parser};
pub use writer::{Writer, WriterConfig};
