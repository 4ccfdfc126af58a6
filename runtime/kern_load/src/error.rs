//! Error taxonomy for `load` and `require`.
//!
//! Errors raised by the evaluator while executing a loaded file are not part
//! of this enum: they travel through the façade as the evaluator's own error
//! type (see [`crate::Evaluator::Error`]).

use std::io;

/// A failure produced by argument validation, resolution or file access.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// An identifier, search-path entry or search-path list has the wrong type.
    #[error("wrong argument type {found} (expected {expected})")]
    InvalidArgumentType {
        found: &'static str,
        expected: &'static str,
    },

    /// `load`/`require` called with the wrong number of arguments.
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    InvalidArgumentArity { given: usize, expected: usize },

    /// Text that cannot name a path (NUL byte, `~user`, relative home).
    #[error("{0}")]
    InvalidArgumentValue(String),

    /// `~` expansion was requested but no home directory is known.
    #[error("couldn't find HOME environment -- expanding '~'")]
    EnvironmentLookup,

    /// No candidate resolved to a loadable file.
    ///
    /// `path` is always the identifier exactly as the caller supplied it.
    #[error("cannot load such file -- {path}")]
    Load { path: String },

    /// The file passed the existence check but could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Nested `load`/`require` calls exceeded the configured depth.
    #[error("load nesting exceeded {depth} levels at '{path}'")]
    NestingTooDeep { path: String, depth: usize },
}

/// Coarse error class, for callers that branch on the class rather than
/// the exact variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    TypeError,
    ArgumentError,
    LoadError,
    IoError,
}

impl LoaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoaderError::InvalidArgumentType { .. } => ErrorKind::TypeError,
            LoaderError::InvalidArgumentArity { .. }
            | LoaderError::InvalidArgumentValue(_)
            | LoaderError::EnvironmentLookup => ErrorKind::ArgumentError,
            LoaderError::Load { .. } | LoaderError::NestingTooDeep { .. } => ErrorKind::LoadError,
            LoaderError::Io { .. } => ErrorKind::IoError,
        }
    }

    /// The identifier carried by a `Load` error.
    pub fn load_path(&self) -> Option<&str> {
        match self {
            LoaderError::Load { path } => Some(path),
            _ => None,
        }
    }

    #[cold]
    pub(crate) fn null_byte() -> Self {
        LoaderError::InvalidArgumentValue("string contains null byte".to_owned())
    }

    #[cold]
    pub(crate) fn not_found(path: &str) -> Self {
        LoaderError::Load {
            path: path.to_owned(),
        }
    }
}
