//! Values crossing the loader boundary.
//!
//! Interpreters hand their dynamically typed arguments to the loader as
//! [`Input`]; the loader checks shape and type exactly once, turning the text
//! argument into an [`Identifier`].

use crate::error::LoaderError;

/// An untyped argument or search-path value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// The sentinel value (`nil`).
    Nil,
    Text(String),
    List(Vec<Input>),
    /// Any other value, described by its type name.
    Other(&'static str),
}

impl Input {
    pub fn type_name(&self) -> &'static str {
        match self {
            Input::Nil => "nil",
            Input::Text(_) => "String",
            Input::List(_) => "Array",
            Input::Other(name) => name,
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_owned())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(value: Option<T>) -> Self {
        value.map_or(Input::Nil, Into::into)
    }
}

impl<T: Into<Input>> FromIterator<T> for Input {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Input::List(iter.into_iter().map(Into::into).collect())
    }
}

/// A validated identifier: text without NUL bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validate the argument list of a `load`/`require` call.
    pub fn from_args(args: &[Input]) -> Result<Self, LoaderError> {
        let [arg] = args else {
            return Err(LoaderError::InvalidArgumentArity {
                given: args.len(),
                expected: 1,
            });
        };
        Self::from_input(arg)
    }

    pub fn from_input(input: &Input) -> Result<Self, LoaderError> {
        match input {
            Input::Text(text) => Self::parse(text.as_str()),
            other => Err(LoaderError::InvalidArgumentType {
                found: other.type_name(),
                expected: "String",
            }),
        }
    }

    pub fn parse(text: impl Into<String>) -> Result<Self, LoaderError> {
        let text = text.into();
        if text.contains('\0') {
            return Err(LoaderError::null_byte());
        }
        Ok(Identifier(text))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
