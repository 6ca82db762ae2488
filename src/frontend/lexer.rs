//! Lexer for Tessel
//!
//! Converts source code into a lazy stream of tokens. The parser pulls tokens
//! one at a time through [`Lexer::peek`] and [`Lexer::advance`]; the stream
//! ends with a single `Eof` token which is repeated if asked for again.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The lexer state
pub struct Lexer {
    /// Source code as characters
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Current 1-based line
    line: usize,
    /// Current 1-based column
    column: usize,
    /// Start position of current token
    start: usize,
    start_line: usize,
    start_column: usize,
    /// One-token lookahead buffer
    lookahead: Option<Token>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_line: 1,
            start_column: 1,
            lookahead: None,
        }
    }

    /// Return the next token without consuming it
    pub fn peek(&mut self) -> Result<&Token> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.lookahead.insert(token))
    }

    /// Consume and return the next token
    pub fn advance(&mut self) -> Result<Token> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.next_token(),
        }
    }

    /// Tokenize the entire source, including the trailing `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.advance()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    // ==================== Character Cursor ====================

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Consume one character, keeping line/column current
    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn mark_start(&mut self) {
        self.start = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    /// Span from the token start to the current position
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos, self.start_line, self.start_column)
    }

    /// Span covering only the character under the cursor
    fn here(&self) -> Span {
        Span::new(self.pos, self.pos + 1, self.line, self.column)
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.pos].iter().collect()
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.make_span())
    }

    // ==================== Scanning ====================

    /// Skip whitespace and `#` line comments
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '#' => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan the next token from the source
    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.mark_start();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::eof(self.make_span())),
        };

        let token = if c.is_alphabetic() {
            self.read_identifier()
        } else if c.is_ascii_digit() {
            self.read_number()?
        } else if c == '"' {
            self.read_string()?
        } else if c == '\'' {
            self.read_char()?
        } else {
            self.read_symbol()?
        };

        log::trace!("lexed {:?} at {}", token.kind, token.span);
        Ok(token)
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }

        let text = self.lexeme();
        let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Ident(text));
        self.make_token(kind)
    }

    fn read_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    /// Consume whatever is glued onto a bad number and report it
    fn malformed_number(&mut self) -> Error {
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        Error::MalformedNumber { text: self.lexeme(), span: self.make_span() }
    }

    /// Read a number literal: `digits` or `digits.digits`
    fn read_number(&mut self) -> Result<Token> {
        self.read_digits();

        let mut is_double = false;
        if self.peek_char() == Some('.') {
            if !self.peek_next_char().map_or(false, |c| c.is_ascii_digit()) {
                return Err(self.malformed_number());
            }
            is_double = true;
            self.bump(); // consume '.'
            self.read_digits();
        }

        if let Some(c) = self.peek_char() {
            let trailing_dot = c == '.' && self.peek_next_char().map_or(false, |n| n.is_ascii_digit());
            if c.is_alphabetic() || c == '_' || trailing_dot {
                return Err(self.malformed_number());
            }
        }

        let text = self.lexeme();
        if is_double {
            let value = text
                .parse()
                .map_err(|_| Error::MalformedNumber { text: text.clone(), span: self.make_span() })?;
            Ok(self.make_token(TokenKind::DoubleLit(value)))
        } else {
            Ok(self.make_token(TokenKind::IntLit(text)))
        }
    }

    /// Read the character after a backslash. `None` means the input ended.
    fn read_escape(&mut self, quote: char) -> Result<Option<char>> {
        let backslash = self.here();
        self.bump(); // consume '\'
        let c = match self.peek_char() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('"') if quote == '"' => '"',
            Some(c) if c != '\n' => return Err(Error::InvalidEscape { ch: c, span: backslash }),
            _ => return Ok(None),
        };
        self.bump();
        Ok(Some(c))
    }

    /// Read a string literal
    fn read_string(&mut self) -> Result<Token> {
        self.bump(); // consume opening quote

        let mut value = String::new();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(Error::UnterminatedString { span: self.make_span() });
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => match self.read_escape('"')? {
                    Some(c) => value.push(c),
                    None => return Err(Error::UnterminatedString { span: self.make_span() }),
                },
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }

        Ok(self.make_token(TokenKind::StringLit(value)))
    }

    /// Read a character literal: exactly one (possibly escaped) character
    fn read_char(&mut self) -> Result<Token> {
        self.bump(); // consume opening quote

        let c = match self.peek_char() {
            None | Some('\n') => return Err(Error::UnterminatedChar { span: self.make_span() }),
            Some('\'') => {
                self.bump();
                return Err(Error::InvalidCharLiteral { span: self.make_span() });
            }
            Some('\\') => match self.read_escape('\'')? {
                Some(c) => c,
                None => return Err(Error::UnterminatedChar { span: self.make_span() }),
            },
            Some(c) => {
                self.bump();
                c
            }
        };

        match self.peek_char() {
            Some('\'') => {
                self.bump();
                Ok(self.make_token(TokenKind::CharLit(c)))
            }
            None | Some('\n') => Err(Error::UnterminatedChar { span: self.make_span() }),
            Some(_) => Err(Error::InvalidCharLiteral { span: self.make_span() }),
        }
    }

    /// Read an operator or punctuation token, longest match first
    fn read_symbol(&mut self) -> Result<Token> {
        let span = self.here();
        let c = match self.bump() {
            Some(c) => c,
            None => return Ok(Token::eof(self.make_span())),
        };

        let kind = match c {
            '=' => {
                if self.peek_char() == Some('=') {
                    self.bump();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.bump();
                    TokenKind::Ne
                } else {
                    return Err(Error::UnexpectedChar { ch: c, span });
                }
            }
            '<' => {
                if self.peek_char() == Some('=') {
                    self.bump();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek_char() == Some('=') {
                    self.bump();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            _ => return Err(Error::UnexpectedChar { ch: c, span }),
        };

        Ok(self.make_token(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(source: &str) -> Error {
        Lexer::new(source).tokenize().unwrap_err()
    }

    #[test]
    fn test_simple_tokens() {
        assert_eq!(
            kinds("fun void main() { }"),
            vec![
                TokenKind::Fun,
                TokenKind::Void,
                TokenKind::Ident("main".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t # only a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_need_exact_match() {
        assert_eq!(
            kinds("var variable upto upto2 int_x"),
            vec![
                TokenKind::Var,
                TokenKind::Ident("variable".into()),
                TokenKind::Upto,
                TokenKind::Ident("upto2".into()),
                TokenKind::Ident("int_x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(
            kinds("café naïve_2 ω"),
            vec![
                TokenKind::Ident("café".into()),
                TokenKind::Ident("naïve_2".into()),
                TokenKind::Ident("ω".into()),
                TokenKind::Eof,
            ]
        );
        let tokens = Lexer::new("é = 1").tokenize().unwrap();
        assert_eq!(tokens[1].span.column, 3);
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("42 3.14 0").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::IntLit("42".into()));
        assert!(matches!(tokens[1].kind, TokenKind::DoubleLit(f) if (f - 3.14).abs() < 0.001));
        assert_eq!(tokens[1].lexeme, "3.14");
        assert_eq!(tokens[2].kind, TokenKind::IntLit("0".into()));
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(matches!(lex_err("1."), Error::MalformedNumber { ref text, .. } if text == "1."));
        assert!(matches!(lex_err("1.x"), Error::MalformedNumber { ref text, .. } if text == "1.x"));
        assert!(matches!(lex_err("12abc"), Error::MalformedNumber { ref text, .. } if text == "12abc"));
        assert!(matches!(lex_err("1.2.3"), Error::MalformedNumber { .. }));
        assert!(matches!(lex_err("1e5"), Error::MalformedNumber { .. }));
    }

    #[test]
    fn test_long_digit_runs_are_ints() {
        let tokens = Lexer::new("99999999999999999999 007").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::IntLit("99999999999999999999".into()));
        assert_eq!(tokens[0].lexeme, "99999999999999999999");
        assert_eq!(tokens[1].kind, TokenKind::IntLit("007".into()));
    }

    #[test]
    fn test_leading_dot_is_not_a_number() {
        assert_eq!(kinds(".5"), vec![TokenKind::Dot, TokenKind::IntLit("5".into()), TokenKind::Eof]);
    }

    #[test]
    fn test_strings() {
        let tokens = Lexer::new(r#""hello\tworld\n" "" "say \"hi\"""#).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLit("hello\tworld\n".into()));
        assert_eq!(tokens[0].lexeme, r#""hello\tworld\n""#);
        assert_eq!(tokens[1].kind, TokenKind::StringLit(String::new()));
        assert_eq!(tokens[2].kind, TokenKind::StringLit("say \"hi\"".into()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_err("\"abc\n\"");
        assert!(matches!(err, Error::UnterminatedString { .. }));
        assert_eq!((err.line(), err.column()), (1, 1));
        assert!(matches!(lex_err("x = \"abc"), Error::UnterminatedString { .. }));
        assert!(matches!(lex_err(r#""bad \q""#), Error::InvalidEscape { ch: 'q', .. }));
    }

    #[test]
    fn test_chars() {
        assert_eq!(
            kinds(r"'a' '\n' '\'' '\\' ' '"),
            vec![
                TokenKind::CharLit('a'),
                TokenKind::CharLit('\n'),
                TokenKind::CharLit('\''),
                TokenKind::CharLit('\\'),
                TokenKind::CharLit(' '),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bad_chars() {
        assert!(matches!(lex_err("''"), Error::InvalidCharLiteral { .. }));
        assert!(matches!(lex_err("'ab'"), Error::InvalidCharLiteral { .. }));
        assert!(matches!(lex_err("'a"), Error::UnterminatedChar { .. }));
        assert!(matches!(lex_err("'\n'"), Error::UnterminatedChar { .. }));
        assert!(matches!(lex_err(r"'\x'"), Error::InvalidEscape { ch: 'x', .. }));
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("= == != < <= > >= + - * / % . , ; : ==="),
            vec![
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::Ne,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Dot,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::EqEq,
                TokenKind::Eq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_illegal_characters() {
        let err = lex_err("var x = 1\n  y @ 2");
        assert!(matches!(err, Error::UnexpectedChar { ch: '@', .. }));
        assert_eq!((err.line(), err.column()), (2, 5));
        assert!(matches!(lex_err("!x"), Error::UnexpectedChar { ch: '!', .. }));
        assert!(matches!(lex_err("a && b"), Error::UnexpectedChar { ch: '&', .. }));
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("fun void f() {\n  # note\n\treturn 1\n}").tokenize().unwrap();
        let positions: Vec<(usize, usize)> =
            tokens.iter().map(|t| (t.span.line, t.span.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 5), (1, 10), (1, 11), (1, 12), (1, 14), (3, 2), (3, 9), (4, 1), (4, 2)]
        );
    }

    #[test]
    fn test_peek_then_advance() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.peek().unwrap().lexeme, "a");
        assert_eq!(lexer.peek().unwrap().lexeme, "a");
        assert_eq!(lexer.advance().unwrap().lexeme, "a");
        assert_eq!(lexer.advance().unwrap().lexeme, "b");
        assert!(lexer.advance().unwrap().is_eof());
        assert!(lexer.advance().unwrap().is_eof());
        assert!(lexer.peek().unwrap().is_eof());
    }

    #[test]
    fn test_comments_produce_no_tokens() {
        assert_eq!(
            kinds("x # trailing ( { '\ny"),
            vec![TokenKind::Ident("x".into()), TokenKind::Ident("y".into()), TokenKind::Eof]
        );
    }
}
