//! Lexer for Kern scripts using logos.

use logos::Logos;

use crate::ast::Span;
use crate::error::SyntaxError;

/// Global that holds the search path list.
pub const LOAD_PATH: &str = "$LOAD_PATH";

/// Raw token from logos (before unescaping).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace
enum RawToken {
    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\n")]
    Newline,
    #[token(";")]
    Semicolon,

    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("__FILE__")]
    File,

    #[token("=")]
    Eq,
    #[token("<<")]
    Shovel,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,

    #[regex(r"-?[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<i64>().ok())]
    Int(i64),

    // No unescaped newlines in either form
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    DoubleQuoted,
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    SingleQuoted,

    #[regex(r":[a-zA-Z_][a-zA-Z0-9_]*[?!]?")]
    Symbol,

    #[token("$:")]
    LoadPathAlias,
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    Global,

    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    Const,
    #[regex(r"[a-z_][a-zA-Z0-9_]*[?!]?")]
    Ident,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Newline,
    Semicolon,
    Nil,
    True,
    False,
    File,
    Eq,
    Shovel,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Int(i64),
    Str(String),
    Sym(String),
    /// Includes the leading `$`.
    Global(String),
    Const(String),
    Ident(String),
    Eof,
}

impl TokenKind {
    /// Whether this token can begin an expression.
    pub fn starts_expr(&self) -> bool {
        matches!(
            self,
            TokenKind::Nil
                | TokenKind::True
                | TokenKind::False
                | TokenKind::File
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Int(_)
                | TokenKind::Str(_)
                | TokenKind::Sym(_)
                | TokenKind::Global(_)
                | TokenKind::Const(_)
                | TokenKind::Ident(_)
        )
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Newline => "end of line".to_owned(),
            TokenKind::Semicolon => "';'".to_owned(),
            TokenKind::Nil => "'nil'".to_owned(),
            TokenKind::True => "'true'".to_owned(),
            TokenKind::False => "'false'".to_owned(),
            TokenKind::File => "'__FILE__'".to_owned(),
            TokenKind::Eq => "'='".to_owned(),
            TokenKind::Shovel => "'<<'".to_owned(),
            TokenKind::LParen => "'('".to_owned(),
            TokenKind::RParen => "')'".to_owned(),
            TokenKind::LBracket => "'['".to_owned(),
            TokenKind::RBracket => "']'".to_owned(),
            TokenKind::Comma => "','".to_owned(),
            TokenKind::Int(n) => format!("integer {n}"),
            TokenKind::Str(_) => "string literal".to_owned(),
            TokenKind::Sym(s) => format!("symbol :{s}"),
            TokenKind::Global(name) | TokenKind::Const(name) | TokenKind::Ident(name) => {
                format!("'{name}'")
            }
            TokenKind::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Lex source text into tokens, ending with [`TokenKind::Eof`].
///
/// Comments are dropped; newlines are kept since they end statements.
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        let kind = match result {
            Ok(RawToken::Comment) => continue,
            Ok(raw) => convert_token(raw, slice),
            Err(()) => {
                return Err(SyntaxError::new(
                    format!("unexpected character sequence `{slice}`"),
                    span,
                ));
            }
        };
        tokens.push(Token { kind, span });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(source.len()),
    });
    Ok(tokens)
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Newline => TokenKind::Newline,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Nil => TokenKind::Nil,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::File => TokenKind::File,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Shovel => TokenKind::Shovel,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::DoubleQuoted => TokenKind::Str(unescape_double(&slice[1..slice.len() - 1])),
        RawToken::SingleQuoted => TokenKind::Str(unescape_single(&slice[1..slice.len() - 1])),
        RawToken::Symbol => TokenKind::Sym(slice[1..].to_owned()),
        RawToken::LoadPathAlias => TokenKind::Global(LOAD_PATH.to_owned()),
        RawToken::Global => TokenKind::Global(slice.to_owned()),
        RawToken::Const => TokenKind::Const(slice.to_owned()),
        RawToken::Ident => TokenKind::Ident(slice.to_owned()),
        // filtered out by `lex`
        RawToken::Comment => TokenKind::Newline,
    }
}

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '0' => Some('\0'),
        _ => None,
    }
}

/// Double-quoted strings: the usual escapes. Unknown escapes are kept
/// literally (`\q` stays `\q`).
fn unescape_double(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(esc) => match resolve_escape(esc) {
                Some(resolved) => result.push(resolved),
                None => {
                    result.push('\\');
                    result.push(esc);
                }
            },
            None => result.push('\\'),
        }
    }
    result
}

/// Single-quoted strings: only `\\` and `\'` are escapes.
fn unescape_single(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '\'' {
                    result.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }
    result
}
