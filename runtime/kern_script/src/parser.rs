//! Recursive-descent parser.
//!
//! ```text
//! program  := sep* (stmt (sep+ stmt)*)? sep*
//! stmt     := IDENT '=' expr | CONST '=' expr | GLOBAL '=' expr | expr
//! expr     := operand ('<<' operand)*
//! operand  := literal | '[' list? ']' | '(' expr ')'
//!           | IDENT '(' list? ')' | IDENT list | IDENT
//!           | CONST | GLOBAL
//! ```
//!
//! `IDENT list` is a command call (`require "set"`) and is only recognised
//! when the name is followed on the same line by something that can start
//! an expression.

use crate::ast::{Expr, ExprKind, Program, Span, Stmt, StmtKind};
use crate::error::SyntaxError;
use crate::lexer::{lex, Token, TokenKind};

/// Parse a complete source file.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = lex(source)?;
    Parser::new(tokens).program()
}

enum Target {
    Local,
    Const,
    Global,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        // `lex` always ends with Eof, which is never consumed
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn at_separator(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::Semicolon
        )
    }

    fn skip_separators(&mut self) {
        while self.at_separator() {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("expected {}", kind.describe())))
        }
    }

    #[cold]
    fn unexpected(&self, context: &str) -> SyntaxError {
        let token = self.current();
        SyntaxError::new(
            format!("unexpected {}, {context}", token.kind.describe()),
            token.span,
        )
    }

    fn program(mut self) -> Result<Program, SyntaxError> {
        let mut stmts = Vec::new();
        self.skip_separators();
        while !self.check(&TokenKind::Eof) {
            stmts.push(self.stmt()?);
            if !self.at_separator() && !self.check(&TokenKind::Eof) {
                return Err(self.unexpected("expected end of statement"));
            }
            self.skip_separators();
        }
        Ok(Program { stmts })
    }

    fn stmt(&mut self) -> Result<Stmt, SyntaxError> {
        if self.peek_kind(1) == &TokenKind::Eq {
            let start = self.current().span;
            let (name, target) = match &self.current().kind {
                TokenKind::Ident(name) => (name.clone(), Target::Local),
                TokenKind::Const(name) => (name.clone(), Target::Const),
                TokenKind::Global(name) => (name.clone(), Target::Global),
                _ => return Err(self.unexpected("cannot assign to this")),
            };
            self.advance();
            self.advance();
            self.skip_newlines();

            let value = self.expr()?;
            let span = start.merge(value.span);
            let kind = match target {
                Target::Local => StmtKind::AssignLocal { name, value },
                Target::Const => StmtKind::AssignConst { name, value },
                Target::Global => StmtKind::AssignGlobal { name, value },
            };
            return Ok(Stmt { kind, span });
        }

        let expr = self.expr()?;
        Ok(Stmt {
            span: expr.span,
            kind: StmtKind::Expr(expr),
        })
    }

    fn expr(&mut self) -> Result<Expr, SyntaxError> {
        let target = self.operand()?;
        if !self.check(&TokenKind::Shovel) {
            return Ok(target);
        }

        let mut values = Vec::new();
        while self.check(&TokenKind::Shovel) {
            self.advance();
            self.skip_newlines();
            values.push(self.operand()?);
        }
        let span = values
            .last()
            .map_or(target.span, |last| target.span.merge(last.span));
        Ok(Expr::new(
            ExprKind::Append {
                target: Box::new(target),
                values,
            },
            span,
        ))
    }

    fn operand(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.advance();
        let span = token.span;
        let kind = match token.kind {
            TokenKind::Nil => ExprKind::Nil,
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::File => ExprKind::File,
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::Str(s) => ExprKind::Str(s),
            TokenKind::Sym(s) => ExprKind::Sym(s),
            TokenKind::Const(name) => ExprKind::Const(name),
            TokenKind::Global(name) => ExprKind::Global(name),
            TokenKind::LBracket => {
                let items = self.list(&TokenKind::RBracket)?;
                let close = self.expect(&TokenKind::RBracket)?;
                return Ok(Expr::new(ExprKind::Array(items), span.merge(close.span)));
            }
            TokenKind::LParen => {
                self.skip_newlines();
                let mut inner = self.expr()?;
                self.skip_newlines();
                let close = self.expect(&TokenKind::RParen)?;
                inner.span = span.merge(close.span);
                return Ok(inner);
            }
            TokenKind::Ident(name) => return self.name_or_call(name, span),
            other => {
                return Err(SyntaxError::new(
                    format!("unexpected {}, expected an expression", other.describe()),
                    span,
                ));
            }
        };
        Ok(Expr::new(kind, span))
    }

    fn name_or_call(&mut self, name: String, span: Span) -> Result<Expr, SyntaxError> {
        // `foo(...)` only when the paren is directly attached
        if self.check(&TokenKind::LParen) && self.current().span.start == span.end {
            self.advance();
            let args = self.list(&TokenKind::RParen)?;
            let close = self.expect(&TokenKind::RParen)?;
            return Ok(Expr::new(
                ExprKind::Call { name, args },
                span.merge(close.span),
            ));
        }

        if self.current().kind.starts_expr() {
            let mut args = vec![self.expr()?];
            while self.check(&TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
                args.push(self.expr()?);
            }
            let end = args.last().map_or(span, |arg| arg.span);
            return Ok(Expr::new(ExprKind::Call { name, args }, span.merge(end)));
        }

        Ok(Expr::new(ExprKind::Name(name), span))
    }

    /// Comma-separated expressions up to (not including) `close`. Newlines
    /// inside brackets are insignificant.
    fn list(&mut self, close: &TokenKind) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.check(close) {
            items.push(self.expr()?);
            self.skip_newlines();
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
            self.skip_newlines();
        }
        Ok(items)
    }
}
