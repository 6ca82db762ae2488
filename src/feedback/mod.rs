//! Structured Feedback Module
//!
//! Provides machine-readable output for tools driving the checker:
//! - JSON error reports with fix suggestions
//! - Per-file check summaries

use serde::{Deserialize, Serialize};
use crate::utils::{Error, ErrorKind};

// ==================== Structured Error Report ====================

/// A structured report for one front-end error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "S0007")
    pub code: String,

    /// Which phase rejected the input
    pub kind: Phase,

    /// Human-readable message
    pub message: String,

    /// Location information
    pub location: Location,

    /// Suggested fixes
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lexical,
    Syntax,
}

impl From<ErrorKind> for Phase {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Lexical => Phase::Lexical,
            ErrorKind::Syntax => Phase::Syntax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Description of the fix
    pub message: String,

    /// The replacement text
    pub replacement: Option<String>,
}

// ==================== Check Feedback ====================

/// Outcome of checking one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckFeedback {
    pub success: bool,
    pub source_file: String,
    pub diagnostics: Vec<ErrorReport>,
    pub stats: CheckStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckStats {
    /// Time spent lexing and parsing, in microseconds
    pub parse_time_us: u64,

    /// Lines of source
    pub loc: usize,
}

// ==================== Error Conversion ====================

impl ErrorReport {
    /// Create an error report from a front-end error
    pub fn from_error(error: &Error, file_name: &str) -> Self {
        let span = error.span();
        Self {
            code: error.code().to_string(),
            kind: error.kind().into(),
            message: error.to_string(),
            location: Location {
                file: file_name.to_string(),
                line: span.line,
                column: span.column,
            },
            suggestions: suggestions_for(error),
        }
    }

    /// `file:line:col: kind error: message`, for terminal output
    pub fn render(&self) -> String {
        format!(
            "{}:{}:{}: {} error: {}",
            self.location.file,
            self.location.line,
            self.location.column,
            match self.kind {
                Phase::Lexical => "lexical",
                Phase::Syntax => "syntax",
            },
            self.message
        )
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn suggestion(message: &str, replacement: Option<&str>) -> Suggestion {
    Suggestion {
        message: message.to_string(),
        replacement: replacement.map(str::to_string),
    }
}

/// Fix hints for the mistakes people make most often
fn suggestions_for(error: &Error) -> Vec<Suggestion> {
    match error {
        Error::UnterminatedBlock { .. } => {
            vec![suggestion("Close the block with '}'", Some("}"))]
        }
        Error::UnexpectedTopLevel { .. } => {
            vec![suggestion("Statements must appear inside a function body", None)]
        }
        Error::UnexpectedToken { expected, .. } if expected.contains("upto") => vec![
            suggestion("Count upwards with 'upto'", Some("upto")),
            suggestion("Count downwards with 'downto'", Some("downto")),
        ],
        Error::UnexpectedToken { expected, .. } if expected.starts_with("'('") => {
            vec![suggestion("Conditions of 'if' and 'elif' must be parenthesized", Some("("))]
        }
        Error::UnterminatedString { .. } => {
            vec![suggestion("Close the string with '\"' on the same line", Some("\""))]
        }
        Error::UnexpectedChar { ch: '!', .. } => {
            vec![suggestion("Use 'not' for logical negation", Some("not"))]
        }
        Error::UnexpectedChar { ch: '&', .. } => {
            vec![suggestion("Use 'and' for logical conjunction", Some("and"))]
        }
        Error::UnexpectedChar { ch: '|', .. } => {
            vec![suggestion("Use 'or' for logical disjunction", Some("or"))]
        }
        _ => vec![],
    }
}

impl CheckFeedback {
    /// Create a successful feedback
    pub fn success(source_file: String, stats: CheckStats) -> Self {
        Self {
            success: true,
            source_file,
            diagnostics: vec![],
            stats,
        }
    }

    /// Create a failed feedback
    pub fn failure(source_file: String, error: ErrorReport, stats: CheckStats) -> Self {
        Self {
            success: false,
            source_file,
            diagnostics: vec![error],
            stats,
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Output as compact JSON (for programmatic use)
    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
