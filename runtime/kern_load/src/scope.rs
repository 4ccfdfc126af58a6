//! Execution scopes for loaded files.
//!
//! Two tiers: a [`Namespace`] holding constants and globals, shared by every
//! file the process executes, and an [`ExecutionScope`] holding the local
//! bindings of one execution. The loader builds a fresh `ExecutionScope` for
//! each file and drops it when the file finishes, so locals never reach the
//! caller while constants and globals are visible both ways.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::LoaderError;
use crate::loader::Loader;

/// A single-threaded shared cell.
///
/// Wraps `Rc<RefCell<T>>`; cloning shares the same value.
#[repr(transparent)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// Whether two handles point at the same value.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.0).finish()
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}

impl<T> Deref for Shared<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Top-level state shared by the loader's caller and every loaded file.
#[derive(Clone, Debug)]
pub struct Namespace<V> {
    constants: FxHashMap<String, V>,
    globals: FxHashMap<String, V>,
}

impl<V> Default for Namespace<V> {
    fn default() -> Self {
        Namespace {
            constants: FxHashMap::default(),
            globals: FxHashMap::default(),
        }
    }
}

impl<V: Clone> Namespace<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(&self, name: &str) -> Option<V> {
        self.constants.get(name).cloned()
    }

    /// Define a constant, returning the previous value if it was redefined.
    pub fn set_constant(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.constants.insert(name.into(), value)
    }

    pub fn global(&self, name: &str) -> Option<V> {
        self.globals.get(name).cloned()
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: V) {
        self.globals.insert(name.into(), value);
    }

    pub fn global_mut(&mut self, name: &str) -> Option<&mut V> {
        self.globals.get_mut(name)
    }
}

/// Local bindings for one execution, layered over a shared [`Namespace`].
pub struct ExecutionScope<V> {
    locals: FxHashMap<String, V>,
    namespace: Shared<Namespace<V>>,
    path: String,
}

impl<V: Clone> ExecutionScope<V> {
    /// A scope with no locals for the file at `path`.
    pub fn new(namespace: Shared<Namespace<V>>, path: impl Into<String>) -> Self {
        ExecutionScope {
            locals: FxHashMap::default(),
            namespace,
            path: path.into(),
        }
    }

    /// The canonical path of the file being executed.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn namespace(&self) -> &Shared<Namespace<V>> {
        &self.namespace
    }

    pub fn local(&self, name: &str) -> Option<&V> {
        self.locals.get(name)
    }

    pub fn local_mut(&mut self, name: &str) -> Option<&mut V> {
        self.locals.get_mut(name)
    }

    /// Bind or rebind a local.
    pub fn set_local(&mut self, name: impl Into<String>, value: V) {
        self.locals.insert(name.into(), value);
    }

    pub fn constant(&self, name: &str) -> Option<V> {
        self.namespace.borrow().constant(name)
    }

    pub fn set_constant(&self, name: impl Into<String>, value: V) -> Option<V> {
        self.namespace.borrow_mut().set_constant(name, value)
    }

    pub fn global(&self, name: &str) -> Option<V> {
        self.namespace.borrow().global(name)
    }

    pub fn set_global(&self, name: impl Into<String>, value: V) {
        self.namespace.borrow_mut().set_global(name, value);
    }
}

/// The interpreter that executes loaded source text.
///
/// The loader passes itself back into [`Evaluator::evaluate`] so loaded code
/// can issue nested `load`/`require` calls.
pub trait Evaluator {
    type Value: Clone;

    /// Errors raised by executed code. Loader failures convert into it, and
    /// evaluator errors pass through the loader untouched.
    type Error: From<LoaderError>;

    /// The namespace shared between the caller and loaded files.
    fn namespace(&self) -> Shared<Namespace<Self::Value>>;

    fn evaluate(
        &mut self,
        loader: &mut Loader,
        source: &str,
        scope: &mut ExecutionScope<Self::Value>,
    ) -> Result<(), Self::Error>;
}
