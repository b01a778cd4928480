//! Error types for codeanalysis-common

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self::new(pos, pos)
    }
}

/// Broad failure category a caller can branch on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The file or directory does not exist
    NotFound,
    /// The file exists but could not be read or written
    Io,
    /// The input was read but is not well-formed
    Malformed,
    /// The caller passed something the operation cannot work with
    Invalid,
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io(io::ErrorKind),
    InvalidUtf8,
    UnexpectedEof,
    UnexpectedToken,
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    InvalidEntity { entity: String },
    InvalidName { name: String },
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    PropertyConflict { name: String },
    NotAContainer,
}

impl ErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound => ErrorClass::NotFound,
            Self::Io(_) => ErrorClass::Io,
            Self::InvalidUtf8
            | Self::UnexpectedEof
            | Self::UnexpectedToken
            | Self::MismatchedTag { .. }
            | Self::DuplicateAttribute { .. }
            | Self::InvalidEntity { .. }
            | Self::MaxDepthExceeded { .. }
            | Self::MaxSizeExceeded { .. } => ErrorClass::Malformed,
            Self::InvalidName { .. } | Self::PropertyConflict { .. } | Self::NotAContainer => {
                ErrorClass::Invalid
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Io(kind) => write!(f, "i/o error: {kind}"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::UnexpectedToken => write!(f, "unexpected token"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity { entity } => write!(f, "invalid xml entity: &{entity};"),
            Self::InvalidName { name } => write!(f, "invalid xml name: {name:?}"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::PropertyConflict { name } => {
                write!(f, "property {name:?} already holds an object")
            }
            Self::NotAContainer => write!(f, "target is neither an object nor an array"),
        }
    }
}

/// Main error type for codeanalysis-common
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Option<Span>,
    message: String,
    path: Option<PathBuf>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span: None,
            message,
            path: None,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span: Some(span),
            message: message.into(),
            path: None,
        }
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        let mut err = Self::new(kind);
        err.span = Some(Span::at(pos));
        err
    }

    /// Wrap an I/O failure on `path`, keeping not-found distinct
    pub fn io(err: &io::Error, path: impl AsRef<Path>) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            other => ErrorKind::Io(other),
        };
        Self {
            kind,
            span: None,
            message: err.to_string(),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Attach the file the error came from
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: ", path.display())?;
        }
        match self.span {
            Some(span) => write!(f, "error at {}: {}", span.start, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Result type alias for codeanalysis-common
pub type Result<T> = std::result::Result<T, Error>;
