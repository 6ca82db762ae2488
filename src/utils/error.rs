//! Error handling for Tessel

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of a front-end error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed token
    Lexical,
    /// Token sequence does not match the grammar
    Syntax,
}

/// Front-end error. The first one raised aborts the parse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Lexical Errors ====================

    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unterminated character literal")]
    UnterminatedChar { span: Span },

    #[error("character literal must contain exactly one character")]
    InvalidCharLiteral { span: Span },

    #[error("invalid escape sequence '\\{ch}'")]
    InvalidEscape { ch: char, span: Span },

    #[error("malformed number '{text}'")]
    MalformedNumber { text: String, span: Span },

    // ==================== Syntax Errors ====================

    #[error("expected {expected}, found {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("expected identifier, found {got}")]
    ExpectedIdent { got: String, span: Span },

    #[error("expected type, found {got}")]
    ExpectedType { got: String, span: Span },

    #[error("expected expression, found {got}")]
    ExpectedExpr { got: String, span: Span },

    #[error("expected statement, found {got}")]
    ExpectedStatement { got: String, span: Span },

    #[error("expected function or type definition, found {got}")]
    UnexpectedTopLevel { got: String, span: Span },

    #[error("unterminated block: expected '}}' before end of input")]
    UnterminatedBlock { span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnterminatedChar { span }
            | Self::InvalidCharLiteral { span }
            | Self::InvalidEscape { span, .. }
            | Self::MalformedNumber { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::ExpectedIdent { span, .. }
            | Self::ExpectedType { span, .. }
            | Self::ExpectedExpr { span, .. }
            | Self::ExpectedStatement { span, .. }
            | Self::UnexpectedTopLevel { span, .. }
            | Self::UnterminatedBlock { span } => *span,
        }
    }

    /// Whether the error came from the lexer or the parser
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedChar { .. }
            | Self::UnterminatedString { .. }
            | Self::UnterminatedChar { .. }
            | Self::InvalidCharLiteral { .. }
            | Self::InvalidEscape { .. }
            | Self::MalformedNumber { .. } => ErrorKind::Lexical,
            _ => ErrorKind::Syntax,
        }
    }

    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedChar { .. } => "L0001",
            Self::UnterminatedString { .. } => "L0002",
            Self::UnterminatedChar { .. } => "L0003",
            Self::InvalidCharLiteral { .. } => "L0004",
            Self::InvalidEscape { .. } => "L0005",
            Self::MalformedNumber { .. } => "L0006",
            Self::UnexpectedToken { .. } => "S0001",
            Self::ExpectedIdent { .. } => "S0002",
            Self::ExpectedType { .. } => "S0003",
            Self::ExpectedExpr { .. } => "S0004",
            Self::ExpectedStatement { .. } => "S0005",
            Self::UnexpectedTopLevel { .. } => "S0006",
            Self::UnterminatedBlock { .. } => "S0007",
        }
    }

    /// 1-based line of the offending input
    pub fn line(&self) -> usize {
        self.span().line
    }

    /// 1-based column of the offending input
    pub fn column(&self) -> usize {
        self.span().column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_position() {
        let err = Error::UnexpectedChar { ch: '@', span: Span::new(3, 4, 2, 5) };
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!((err.line(), err.column()), (2, 5));
        assert_eq!(err.to_string(), "unexpected character '@'");

        let err = Error::UnterminatedBlock { span: Span::dummy() };
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.code(), "S0007");
        assert_eq!(err.to_string(), "unterminated block: expected '}' before end of input");
    }
}
