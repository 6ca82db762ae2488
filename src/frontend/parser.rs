//! Parser for Tessel
//!
//! Recursive descent recognizer with one method per grammar rule. Decisions
//! are made on the current token alone, except in two places that also look
//! at the token after it:
//!
//! - `var T x = ...` versus `var x = ...` when `T` is a user type name
//! - `f(...)` versus any other identifier-led statement or operand
//!
//! Expressions use one method per precedence level, lowest first, each
//! looping over its own operators and delegating operands to the next level.
//! Nothing is built; the first mismatch is returned as an [`Error`] located at
//! the offending token.

use crate::frontend::grammar::{Derivation, Rule, Step};
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The parser
pub struct Parser {
    lexer: Lexer,
    /// Token the next decision is made on
    current: Token,
    primed: bool,
    trace: Option<Derivation>,
}

impl Parser {
    /// Create a new parser from a lexer
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            current: Token::eof(Span::dummy()),
            primed: false,
            trace: None,
        }
    }

    /// Record the derivation while parsing
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Derivation::new());
        self
    }

    /// The recorded derivation, if tracing was enabled
    pub fn derivation(&self) -> Option<&Derivation> {
        self.trace.as_ref()
    }

    // ==================== Helper Methods ====================

    fn current_kind(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Kind of the token after the current one
    fn peek(&mut self) -> Result<&TokenKind> {
        Ok(&self.lexer.peek()?.kind)
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.advance()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn is_at_end(&self) -> bool {
        self.current.is_eof()
    }

    fn expect(&mut self, expected: TokenKind, what: &str) -> Result<Token> {
        if self.check(&expected) {
            self.advance()
        } else {
            Err(self.unexpected(what))
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> Result<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn unexpected(&self, what: &str) -> Error {
        Error::UnexpectedToken {
            expected: what.to_string(),
            got: self.current.describe(),
            span: self.current.span,
        }
    }

    fn record(&mut self, step: Step) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(step);
        }
    }

    fn enter(&mut self, rule: Rule) {
        log::trace!("enter {} at {}", rule, self.current.span);
        self.record(Step::Enter(rule));
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program. Succeeds only if the whole input is valid.
    pub fn parse(&mut self) -> Result<()> {
        if !self.primed {
            self.current = self.lexer.advance()?;
            self.primed = true;
        }
        self.enter(Rule::Program);

        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Fun => self.parse_function()?,
                TokenKind::Type => self.parse_typedef()?,
                _ => {
                    return Err(Error::UnexpectedTopLevel {
                        got: self.current.describe(),
                        span: self.current.span,
                    })
                }
            }
        }

        log::debug!("parse complete at {}", self.current.span);
        Ok(())
    }

    /// `fun (void | type) ID ( params ) block`
    fn parse_function(&mut self) -> Result<()> {
        self.enter(Rule::FunctionDef);
        self.expect(TokenKind::Fun, "'fun'")?;

        if !self.consume(&TokenKind::Void)? {
            self.parse_type()?;
        }

        let name = self.parse_ident()?;
        log::debug!("function '{}' at {}", name.lexeme, name.span);

        self.expect(TokenKind::LParen, "'(' after function name")?;
        self.parse_params()?;
        self.expect(TokenKind::RParen, "')' after parameters")?;

        self.parse_block()
    }

    /// `type ID { vdecl* }`
    fn parse_typedef(&mut self) -> Result<()> {
        self.enter(Rule::TypeDef);
        self.expect(TokenKind::Type, "'type'")?;

        let name = self.parse_ident()?;
        log::debug!("type '{}' at {}", name.lexeme, name.span);

        self.expect(TokenKind::LBrace, "'{'")?;
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(Error::UnterminatedBlock { span: self.current.span });
            }
            if !self.check(&TokenKind::Var) {
                return Err(self.unexpected("field declaration or '}'"));
            }
            self.parse_var_decl()?;
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(())
    }

    fn parse_params(&mut self) -> Result<()> {
        self.enter(Rule::Params);
        if self.check(&TokenKind::RParen) {
            return Ok(());
        }

        loop {
            self.parse_type()?;
            self.parse_ident()?;
            if !self.consume(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(())
    }

    fn parse_ident(&mut self) -> Result<Token> {
        match self.current_kind() {
            TokenKind::Ident(_) => self.advance(),
            _ => Err(Error::ExpectedIdent {
                got: self.current.describe(),
                span: self.current.span,
            }),
        }
    }

    /// A primitive type name or a user type identifier
    fn parse_type(&mut self) -> Result<Token> {
        self.enter(Rule::Type);
        let kind = self.current_kind();
        if kind.is_primitive_type() || matches!(kind, TokenKind::Ident(_)) {
            self.advance()
        } else {
            Err(Error::ExpectedType {
                got: self.current.describe(),
                span: self.current.span,
            })
        }
    }

    /// `ID ('.' ID)*`
    fn parse_path(&mut self) -> Result<String> {
        let mut path = self.parse_ident()?.lexeme;
        while self.consume(&TokenKind::Dot)? {
            path.push('.');
            path.push_str(&self.parse_ident()?.lexeme);
        }
        Ok(path)
    }

    fn parse_block(&mut self) -> Result<()> {
        self.enter(Rule::Block);
        self.expect(TokenKind::LBrace, "'{'")?;

        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(Error::UnterminatedBlock { span: self.current.span });
            }
            self.parse_stmt()?;
        }

        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(())
    }

    fn parse_stmt(&mut self) -> Result<()> {
        match self.current_kind() {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Delete => self.parse_delete(),
            TokenKind::Ident(_) => {
                if self.peek()? == &TokenKind::LParen {
                    self.enter(Rule::CallStmt);
                    self.parse_call()
                } else {
                    self.parse_assign()
                }
            }
            _ => Err(Error::ExpectedStatement {
                got: self.current.describe(),
                span: self.current.span,
            }),
        }
    }

    /// `var [type] ID = expr`
    fn parse_var_decl(&mut self) -> Result<()> {
        self.enter(Rule::VarDecl);
        self.expect(TokenKind::Var, "'var'")?;

        let explicit = if self.current_kind().is_primitive_type() {
            true
        } else if matches!(self.current_kind(), TokenKind::Ident(_)) {
            matches!(self.peek()?, TokenKind::Ident(_))
        } else {
            false
        };
        if explicit {
            self.parse_type()?;
        }

        self.parse_ident()?;
        self.expect(TokenKind::Eq, "'=' in variable declaration")?;
        self.parse_expr()
    }

    /// `path = expr`
    fn parse_assign(&mut self) -> Result<()> {
        self.enter(Rule::Assign);
        self.parse_path()?;
        self.expect(TokenKind::Eq, "'=' in assignment")?;
        self.parse_expr()
    }

    /// `if (expr) block (elif (expr) block)* [else block]`
    fn parse_if(&mut self) -> Result<()> {
        self.enter(Rule::If);
        self.expect(TokenKind::If, "'if'")?;
        self.parse_condition("if")?;
        self.parse_block()?;

        while self.check(&TokenKind::Elif) {
            self.enter(Rule::Elif);
            self.advance()?;
            self.parse_condition("elif")?;
            self.parse_block()?;
        }

        if self.check(&TokenKind::Else) {
            self.enter(Rule::Else);
            self.advance()?;
            self.parse_block()?;
        }
        Ok(())
    }

    fn parse_condition(&mut self, keyword: &str) -> Result<()> {
        self.expect(TokenKind::LParen, &format!("'(' after '{}'", keyword))?;
        self.parse_expr()?;
        self.expect(TokenKind::RParen, "')' to close condition")?;
        Ok(())
    }

    /// `while expr block`
    fn parse_while(&mut self) -> Result<()> {
        self.enter(Rule::While);
        self.expect(TokenKind::While, "'while'")?;
        self.parse_expr()?;
        self.parse_block()
    }

    /// `for ID from expr (upto | downto) expr block`
    fn parse_for(&mut self) -> Result<()> {
        self.enter(Rule::For);
        self.expect(TokenKind::For, "'for'")?;
        self.parse_ident()?;
        self.expect(TokenKind::From, "'from'")?;
        self.parse_expr()?;

        match self.current_kind() {
            TokenKind::Upto | TokenKind::Downto => {
                self.advance()?;
            }
            _ => return Err(self.unexpected("'upto' or 'downto'")),
        }

        self.parse_expr()?;
        self.parse_block()
    }

    /// `return [expr]`
    fn parse_return(&mut self) -> Result<()> {
        self.enter(Rule::Return);
        self.expect(TokenKind::Return, "'return'")?;
        if self.current_kind().starts_expr() {
            self.parse_expr()?;
        }
        Ok(())
    }

    /// `delete ID`
    fn parse_delete(&mut self) -> Result<()> {
        self.enter(Rule::Delete);
        self.expect(TokenKind::Delete, "'delete'")?;
        self.parse_ident()?;
        Ok(())
    }

    /// `ID ( [expr (, expr)*] )`
    fn parse_call(&mut self) -> Result<()> {
        let name = self.parse_ident()?;
        self.expect(TokenKind::LParen, "'('")?;

        let mut args = 0;
        if !self.check(&TokenKind::RParen) {
            loop {
                self.parse_expr()?;
                args += 1;
                if !self.consume(&TokenKind::Comma)? {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen, "')' to close argument list")?;
        self.record(Step::Call { name: name.lexeme, args });
        Ok(())
    }

    // ==================== Expressions ====================

    fn parse_expr(&mut self) -> Result<()> {
        self.parse_or()
    }

    /// Left-associative loop over one precedence level
    fn parse_binary_level(
        &mut self,
        ops: &[TokenKind],
        operand: fn(&mut Self) -> Result<()>,
    ) -> Result<()> {
        operand(self)?;
        while ops.iter().any(|op| self.check(op)) {
            let op = self.advance()?;
            operand(self)?;
            self.record(Step::Binary(op.lexeme));
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<()> {
        self.parse_binary_level(&[TokenKind::Or], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<()> {
        self.parse_binary_level(&[TokenKind::And], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<()> {
        self.parse_binary_level(&[TokenKind::EqEq, TokenKind::Ne], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<()> {
        self.parse_binary_level(
            &[TokenKind::Lt, TokenKind::Le, TokenKind::Gt, TokenKind::Ge],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<()> {
        self.parse_binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<()> {
        self.parse_binary_level(
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<()> {
        if self.check(&TokenKind::Minus) || self.check(&TokenKind::Not) {
            let op = self.advance()?;
            self.parse_unary()?;
            self.record(Step::Unary(op.lexeme));
            Ok(())
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<()> {
        match self.current_kind() {
            TokenKind::IntLit(_)
            | TokenKind::DoubleLit(_)
            | TokenKind::CharLit(_)
            | TokenKind::StringLit(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil => {
                let literal = self.advance()?;
                self.record(Step::Operand(literal.lexeme));
                Ok(())
            }
            TokenKind::New => {
                self.advance()?;
                let ty = self.parse_ident()?;
                self.record(Step::Operand(format!("new {}", ty.lexeme)));
                Ok(())
            }
            TokenKind::LParen => {
                self.advance()?;
                self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(())
            }
            TokenKind::Ident(_) => {
                if self.peek()? == &TokenKind::LParen {
                    self.parse_call()
                } else {
                    let path = self.parse_path()?;
                    self.record(Step::Operand(path));
                    Ok(())
                }
            }
            _ => Err(Error::ExpectedExpr {
                got: self.current.describe(),
                span: self.current.span,
            }),
        }
    }
}
