//! Syntax tree for Kern scripts.
//!
//! A program is a flat list of statements; there are no blocks, so every
//! statement runs at the top level of its file.

use std::fmt;
use std::ops::Range;

/// Byte range into the source text (end exclusive).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Empty span at `pos`.
    #[inline]
    pub const fn point(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }

    /// Smallest span covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    /// 1-based line of `start` within `source`.
    pub fn line_in(self, source: &str) -> usize {
        let end = self.start.min(source.len());
        source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `name = value`
    AssignLocal { name: String, value: Expr },
    /// `NAME = value`
    AssignConst { name: String, value: Expr },
    /// `$name = value`
    AssignGlobal { name: String, value: Expr },
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Sym(String),
    /// `__FILE__`
    File,
    Array(Vec<Expr>),
    /// A bare lowercase name: a local if one is bound, otherwise a call
    /// with no arguments.
    Name(String),
    Const(String),
    /// Global name including the leading `$`.
    Global(String),
    /// `name(args)` or `name arg, arg`
    Call { name: String, args: Vec<Expr> },
    /// `target << a << b`
    Append { target: Box<Expr>, values: Vec<Expr> },
}
