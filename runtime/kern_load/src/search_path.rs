//! The ordered search path list consulted for implicit identifiers.
//!
//! The list is stored exactly as the embedder set it, ill-typed entries
//! included. Validation happens when an entry is consulted, so an invalid
//! entry placed after the directory that resolves an identifier is never
//! reported.

use crate::error::LoaderError;
use crate::input::Input;

/// A validated search path entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchEntry<'a> {
    /// The `nil` sentinel: the current working directory.
    CurrentDir,
    Dir(&'a str),
}

/// Process-wide, mutable list of search directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPaths {
    list: Input,
}

impl Default for SearchPaths {
    fn default() -> Self {
        SearchPaths {
            list: Input::List(Vec::new()),
        }
    }
}

impl SearchPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dirs<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchPaths {
            list: Input::List(dirs.into_iter().map(|d| Input::Text(d.into())).collect()),
        }
    }

    /// Replace the whole list. Any value is accepted; a non-list value fails
    /// at the next resolution.
    pub fn replace(&mut self, list: Input) {
        self.list = list;
    }

    /// Append an entry, turning a non-list value into a fresh list.
    pub fn push(&mut self, entry: impl Into<Input>) {
        match &mut self.list {
            Input::List(entries) => entries.push(entry.into()),
            other => *other = Input::List(vec![entry.into()]),
        }
    }

    /// Insert an entry at the front, turning a non-list value into a fresh list.
    pub fn unshift(&mut self, entry: impl Into<Input>) {
        match &mut self.list {
            Input::List(entries) => entries.insert(0, entry.into()),
            other => *other = Input::List(vec![entry.into()]),
        }
    }

    pub fn as_input(&self) -> &Input {
        &self.list
    }

    /// Raw entries, or a type error if the list is not a list at all.
    pub fn entries(&self) -> Result<&[Input], LoaderError> {
        match &self.list {
            Input::List(entries) => Ok(entries),
            other => Err(LoaderError::InvalidArgumentType {
                found: other.type_name(),
                expected: "Array",
            }),
        }
    }
}

/// Validate one raw entry at the moment it is consulted.
pub(crate) fn consult(entry: &Input) -> Result<SearchEntry<'_>, LoaderError> {
    match entry {
        Input::Nil => Ok(SearchEntry::CurrentDir),
        Input::Text(dir) if dir.contains('\0') => Err(LoaderError::null_byte()),
        Input::Text(dir) => Ok(SearchEntry::Dir(dir)),
        other => Err(LoaderError::InvalidArgumentType {
            found: other.type_name(),
            expected: "String",
        }),
    }
}
