//! Error and warning types with rich diagnostics using miette
//!
//! Parse warnings carry spans into the path data so they can be rendered
//! against the source with [`SourceContext`].

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (fixture label, file name or "<path data>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Wrap a diagnostic in a report that renders against this source.
    pub fn report<D>(&self, diagnostic: D) -> miette::Report
    where
        D: Diagnostic + Send + Sync + 'static,
    {
        miette::Report::new(diagnostic).with_source_code(self.named_source())
    }
}

// ============================================================================
// Parse Warnings
// ============================================================================

/// Recoverable problems found while interpreting path data.
///
/// The offending token or command is skipped and parsing continues.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseWarning {
    #[error("invalid number: {token}")]
    #[diagnostic(
        code(pixpath::parse::invalid_number),
        severity(Warning),
        help("the partially collected operands of the current command were dropped")
    )]
    InvalidNumber {
        token: String,
        #[label("expected a number")]
        span: SourceSpan,
    },

    #[error("unknown command: {letter}")]
    #[diagnostic(
        code(pixpath::parse::unknown_command),
        severity(Warning),
        help("operands are ignored until the next valid command")
    )]
    UnknownCommand {
        letter: char,
        #[label("not a path command")]
        span: SourceSpan,
    },

    #[error("command {command} expects operands in groups of {expected}, found {found} left over")]
    #[diagnostic(code(pixpath::parse::incomplete_operands), severity(Warning))]
    IncompleteOperands {
        command: char,
        expected: usize,
        found: usize,
        #[label("incomplete group ends here")]
        span: SourceSpan,
    },

    #[error("operand without a command")]
    #[diagnostic(code(pixpath::parse::stray_operand), severity(Warning))]
    StrayOperand {
        #[label("no command takes this operand")]
        span: SourceSpan,
    },

    #[error("path data could not be tokenized: {message}")]
    #[diagnostic(code(pixpath::parse::untokenizable), severity(Warning))]
    Untokenizable { message: String },
}

// ============================================================================
// Placement Warnings
// ============================================================================

/// Recoverable problems found while placing points along a path.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PlacementWarning {
    #[error("point {index} did not fit on the path (normalized position {position})")]
    #[diagnostic(
        code(pixpath::place::overrun),
        severity(Warning),
        help("the point was placed on the final coordinate")
    )]
    Overrun { index: usize, position: f64 },
}

// ============================================================================
// Import Errors
// ============================================================================

/// Errors that abort a single SVG import.
#[derive(Error, Diagnostic, Debug)]
pub enum ImportError {
    #[error("could not read SVG markup: {message}")]
    #[diagnostic(code(pixpath::import::unreadable))]
    Unreadable {
        message: String,
        #[label("reading stopped here")]
        span: SourceSpan,
    },

    #[error("no <path> elements found")]
    #[diagnostic(
        code(pixpath::import::no_paths),
        help("only <path> elements with a non-empty `d` attribute are imported")
    )]
    NoPaths,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Setting(#[from] SettingError),
}

// ============================================================================
// Setting Errors
// ============================================================================

/// Errors from fixture setting validation.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SettingError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    #[diagnostic(code(pixpath::settings::out_of_range))]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid {name}")]
    #[diagnostic(code(pixpath::settings::invalid_numeric))]
    Numeric {
        name: &'static str,
        #[source]
        source: NumericError,
    },

    #[error("{name} takes a {expected} value")]
    #[diagnostic(code(pixpath::settings::wrong_kind))]
    WrongKind {
        name: &'static str,
        expected: &'static str,
    },
}
