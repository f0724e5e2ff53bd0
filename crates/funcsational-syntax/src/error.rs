//! Error handling types and utilities for the funcsational toolchain.
//!
//! This module provides the unified error system used by every stage of the
//! interpreter. Each error carries its class (structural, lexical, runtime),
//! a descriptive message, and optional source location information so the
//! command-line front end can render a precise excerpt-and-caret diagnostic.
//!
//! # Error Philosophy
//!
//! - **One type, three classes**: the splitter raises structural errors, the
//!   tokenizer lexical errors, the evaluator runtime errors. All share the
//!   same shape and propagate with `?`.
//! - **Precise location information**: line and column numbers whenever the
//!   failure can be pinned to source text.
//! - **Terminal at the boundary**: library code returns `Result`; the CLI is
//!   the single place that renders a diagnostic and exits.
//!
//! # Examples
//!
//! ```rust
//! use funcsational_syntax::error::{ErrorKind, Result, lexical_at};
//!
//! fn scan_digit(c: char, line: usize, col: usize) -> Result<u32> {
//!     match c.to_digit(10) {
//!         Some(d) => Ok(d),
//!         None => lexical_at(line, col, format!("expected a digit, found '{}'", c)),
//!     }
//! }
//!
//! let err = scan_digit('x', 3, 7).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::Lexical);
//! assert_eq!(err.line, Some(3));
//! ```

use std::fmt;

/// The class of a toolchain error, mirroring the stage that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed definition structure: bad header characters, unbalanced
    /// parentheses, junk between the parameter list and the body.
    Structural,
    /// Malformed body text: unterminated strings, bad numbers, unknown
    /// operators or call targets, stray text.
    Lexical,
    /// Evaluation failure: missing entry point, insufficient call arguments,
    /// unresolved variables.
    Runtime,
}

impl ErrorKind {
    /// Human-readable label used in diagnostic headers, e.g. `Lexical error`.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Structural => "Structural error",
            ErrorKind::Lexical => "Lexical error",
            ErrorKind::Runtime => "Runtime error",
        }
    }
}

/// An error raised while splitting, tokenizing or evaluating a program.
///
/// Location information is optional: runtime errors usually have none, while
/// splitter and tokenizer errors always point at the offending character.
///
/// # Examples
///
/// ```rust
/// use funcsational_syntax::error::{Error, ErrorKind};
///
/// let err = Error::with_span(ErrorKind::Structural, "expected '('", 2, 14);
/// assert_eq!(format!("{}", err), "expected '(' at 2:14");
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    /// Which stage produced the error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub msg: String,
    /// Optional line number in the source text (1-based)
    pub line: Option<usize>,
    /// Optional column number in the source text (1-based, in characters)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error without source location information.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates an error pointing at a specific line and column.
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

/// A specialized `Result` type for funcsational operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience constructor for a positioned structural error result.
pub fn structural_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(ErrorKind::Structural, msg, line, col))
}

/// Convenience constructor for a positioned lexical error result.
pub fn lexical_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(ErrorKind::Lexical, msg, line, col))
}

/// Convenience constructor for a runtime error result (no location).
pub fn runtime<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(ErrorKind::Runtime, msg))
}
