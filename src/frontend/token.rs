//! Token definitions for Tessel

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self { kind, lexeme: lexeme.into(), span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, lexeme: String::new(), span }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Human-readable description used in diagnostics
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::IntLit(_)
            | TokenKind::DoubleLit(_)
            | TokenKind::CharLit(_)
            | TokenKind::StringLit(_) => format!("literal {}", self.lexeme),
            kind if kind.is_keyword() => format!("keyword '{}'", self.lexeme),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ============ Keywords ============
    /// fun
    Fun,
    /// var
    Var,
    /// type
    Type,
    /// if
    If,
    /// elif
    Elif,
    /// else
    Else,
    /// while
    While,
    /// for
    For,
    /// from
    From,
    /// upto
    Upto,
    /// downto
    Downto,
    /// return
    Return,
    /// delete
    Delete,
    /// new
    New,
    /// true
    True,
    /// false
    False,
    /// nil
    Nil,
    /// and
    And,
    /// or
    Or,
    /// not
    Not,

    // ============ Primitive Type Names ============
    /// int
    IntType,
    /// double
    DoubleType,
    /// bool
    BoolType,
    /// char
    CharType,
    /// string
    StringType,
    /// void
    Void,

    // ============ Identifiers and Literals ============
    /// Identifier (variable name, function name, user type name)
    Ident(String),
    /// Integer literal, kept as its digit text
    IntLit(String),
    /// Double literal
    DoubleLit(f64),
    /// Character literal
    CharLit(char),
    /// String literal
    StringLit(String),

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// ==
    EqEq,
    /// !=
    Ne,
    /// <
    Lt,
    /// <=
    Le,
    /// >
    Gt,
    /// >=
    Ge,
    /// .
    Dot,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// ,
    Comma,
    /// :
    Colon,
    /// ;
    Semicolon,

    // ============ Special ============
    /// End of file
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Fun
                | TokenKind::Var
                | TokenKind::Type
                | TokenKind::If
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::From
                | TokenKind::Upto
                | TokenKind::Downto
                | TokenKind::Return
                | TokenKind::Delete
                | TokenKind::New
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
        ) || self.is_primitive_type()
            || *self == TokenKind::Void
    }

    /// Built-in type names usable in declarations and signatures
    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            TokenKind::IntType
                | TokenKind::DoubleType
                | TokenKind::BoolType
                | TokenKind::CharType
                | TokenKind::StringType
        )
    }

    /// Whether an expression may begin with this token
    pub fn starts_expr(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::IntLit(_)
                | TokenKind::DoubleLit(_)
                | TokenKind::CharLit(_)
                | TokenKind::StringLit(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::New
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Not
        )
    }

    /// Try to convert an identifier to a keyword
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "fun" => Some(TokenKind::Fun),
            "var" => Some(TokenKind::Var),
            "type" => Some(TokenKind::Type),
            "if" => Some(TokenKind::If),
            "elif" => Some(TokenKind::Elif),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "for" => Some(TokenKind::For),
            "from" => Some(TokenKind::From),
            "upto" => Some(TokenKind::Upto),
            "downto" => Some(TokenKind::Downto),
            "return" => Some(TokenKind::Return),
            "delete" => Some(TokenKind::Delete),
            "new" => Some(TokenKind::New),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "nil" => Some(TokenKind::Nil),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            "int" => Some(TokenKind::IntType),
            "double" => Some(TokenKind::DoubleType),
            "bool" => Some(TokenKind::BoolType),
            "char" => Some(TokenKind::CharType),
            "string" => Some(TokenKind::StringType),
            "void" => Some(TokenKind::Void),
            _ => None,
        }
    }

    /// Short name used by the token dump
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "IDENT",
            TokenKind::IntLit(_) => "INT",
            TokenKind::DoubleLit(_) => "DOUBLE",
            TokenKind::CharLit(_) => "CHAR",
            TokenKind::StringLit(_) => "STRING",
            TokenKind::Eof => "EOF",
            kind if kind.is_keyword() => "KEYWORD",
            _ => "SYMBOL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword_from_str("downto"), Some(TokenKind::Downto));
        assert_eq!(TokenKind::keyword_from_str("string"), Some(TokenKind::StringType));
        assert_eq!(TokenKind::keyword_from_str("to"), None);
        assert_eq!(TokenKind::keyword_from_str("Fun"), None);
    }

    #[test]
    fn test_classification() {
        assert!(TokenKind::Void.is_keyword());
        assert!(!TokenKind::Void.is_primitive_type());
        assert!(TokenKind::CharType.is_primitive_type());
        assert!(TokenKind::Not.starts_expr());
        assert!(!TokenKind::RBrace.starts_expr());
        assert_eq!(TokenKind::Ident("x".into()).name(), "IDENT");
    }

    #[test]
    fn test_describe() {
        let tok = Token::new(TokenKind::Upto, "upto", Span::dummy());
        assert_eq!(tok.describe(), "keyword 'upto'");
        assert_eq!(Token::eof(Span::dummy()).describe(), "end of input");
        let tok = Token::new(TokenKind::Ident("n1".into()), "n1", Span::dummy());
        assert_eq!(tok.describe(), "identifier 'n1'");
    }
}
