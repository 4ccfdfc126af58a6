//! Runtime values.

use std::fmt;

use kern_load::Input;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Sym(String),
    Array(Vec<Value>),
}

impl Value {
    /// Class name, as shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Int(_) => "Integer",
            Value::Str(_) => "String",
            Value::Sym(_) => "Symbol",
            Value::Array(_) => "Array",
        }
    }

    /// Source-like rendering: strings quoted, arrays bracketed.
    pub fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_owned(),
            Value::Str(s) => format!("{s:?}"),
            Value::Sym(s) => format!(":{s}"),
            Value::Array(items) => {
                let inner: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", inner.join(", "))
            }
            other => other.to_string(),
        }
    }

    /// Convert for the loader boundary.
    ///
    /// Strings and arrays map directly; `nil` stays the sentinel. Everything
    /// else is opaque to the loader and only carries its type name.
    pub fn to_input(&self) -> Input {
        match self {
            Value::Nil => Input::Nil,
            Value::Str(s) => Input::Text(s.clone()),
            Value::Array(items) => Input::List(items.iter().map(Value::to_input).collect()),
            Value::Bool(true) => Input::Other("true"),
            Value::Bool(false) => Input::Other("false"),
            other => Input::Other(other.type_name()),
        }
    }

    pub fn from_input(input: &Input) -> Value {
        match input {
            Input::Nil => Value::Nil,
            Input::Text(s) => Value::Str(s.clone()),
            Input::List(items) => Value::Array(items.iter().map(Value::from_input).collect()),
            Input::Other(name) => Value::Sym((*name).to_owned()),
        }
    }
}

impl fmt::Display for Value {
    /// What `puts` prints: `nil` is empty, strings are raw.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) | Value::Sym(s) => f.write_str(s),
            Value::Array(_) => f.write_str(&self.inspect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}
