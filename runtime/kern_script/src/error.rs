//! Script errors.

use kern_load::LoaderError;

use crate::ast::Span;

/// A lexing or parsing failure, before the file name is known.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        SyntaxError {
            message: message.into(),
            span,
        }
    }
}

/// Everything that can stop a script.
///
/// Loader failures are wrapped transparently so `require`/`load` errors
/// raised in nested files reach the outermost caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Keeps the file text so the diagnostic can be rendered after the
    /// loader has moved on.
    #[error("{path}:{line}: syntax error, {message}")]
    Syntax {
        path: String,
        line: usize,
        message: String,
        span: Span,
        text: String,
    },

    #[error("undefined local variable or method '{name}' ({path}:{line})")]
    UndefinedName {
        name: String,
        path: String,
        line: usize,
    },

    #[error("undefined method '{method}' for {receiver} ({path}:{line})")]
    NoMethod {
        method: String,
        receiver: &'static str,
        path: String,
        line: usize,
    },

    #[error("uninitialized constant {name} ({path}:{line})")]
    UninitializedConstant {
        name: String,
        path: String,
        line: usize,
    },

    #[error("wrong number of arguments calling '{method}' (given {given}, expected {expected}) ({path}:{line})")]
    WrongArity {
        method: &'static str,
        given: usize,
        expected: &'static str,
        path: String,
        line: usize,
    },

    /// `raise` from script code.
    #[error("{0}")]
    Raised(String),

    #[error(transparent)]
    Loader(#[from] LoaderError),
}

impl ScriptError {
    pub(crate) fn syntax(path: &str, text: &str, err: SyntaxError) -> Self {
        ScriptError::Syntax {
            path: path.to_owned(),
            line: err.span.line_in(text),
            message: err.message,
            span: err.span,
            text: text.to_owned(),
        }
    }

    /// The loader error behind this failure, if any.
    pub fn as_loader_error(&self) -> Option<&LoaderError> {
        match self {
            ScriptError::Loader(err) => Some(err),
            _ => None,
        }
    }
}
