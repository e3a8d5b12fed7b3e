//! Error taxonomy
//!
//! None of these errors is fatal. They are reported through the diagnostic
//! channel and the last known-good program or configuration stays active.

use alloc::string::String;

use thiserror::Error;

/// What went wrong while parsing a script or a panel configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),
    #[error("'{keyword}' expects {expected}, got {found} argument(s)")]
    Arity {
        keyword: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("{what} {value} is out of range")]
    OutOfRange { what: &'static str, value: String },
    #[error("'{0}' is not a #RRGGBB color")]
    InvalidColor(String),
    #[error("invalid panel json: {0}")]
    InvalidJson(String),
    #[error("undefined region '{0}'")]
    UndefinedRegion(String),
    #[error("undefined state '{0}'")]
    UndefinedState(String),
    #[error("undefined template '{0}'")]
    UndefinedTemplate(String),
    #[error("templates nested deeper than {0} levels")]
    TemplateDepth(usize),
    #[error("unknown shape: {0}")]
    UnknownShape(String),
}

/// Parse failure, with the index of the offending clause.
///
/// For strip scripts `clause` is the index of the `;`-delimited clause.
/// For panel configurations it is the index of the instruction within the
/// section being parsed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("clause {clause}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub clause: usize,
}

impl ParseError {
    pub const fn new(kind: ParseErrorKind, clause: usize) -> Self {
        Self { kind, clause }
    }
}

/// Rejected scalar update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("length {value} outside 1..={max}")]
    LengthOutOfRange { value: i32, max: usize },
    #[error("brightness {0} outside 0..=1")]
    BrightnessOutOfRange(f32),
    #[error("invalid payload '{payload}' on '{topic}'")]
    InvalidPayload { topic: String, payload: String },
}

/// Event referencing a name the current panel program does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("unknown state '{0}'")]
    UnknownState(String),
    #[error("unknown block '{0}'")]
    UnknownBlock(String),
}

/// Any failure while applying an external event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconfigError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("event not supported by this surface: {0}")]
    Unsupported(&'static str),
}
