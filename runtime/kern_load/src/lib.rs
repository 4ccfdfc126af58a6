//! Kern Load - module resolution and load/require engine.
//!
//! Turns the identifier handed to `load` or `require` into a concrete file,
//! executes it in a fresh top-level scope, and remembers what `require` has
//! already executed so repeated requests are skipped.
//!
//! # Architecture
//!
//! ```text
//! Loader::require(ev, args)
//!   ├── Identifier::from_args       (arity, type, NUL checks)
//!   ├── path::classify              (absolute / ~ / ./ / implicit)
//!   ├── SearchPaths                 (ordered directories, validated lazily)
//!   ├── extension::candidates       (`x` -> `x.rb`, then `x`)
//!   ├── LoadCache                   (exact-string set + in-flight marks)
//!   └── Loader::execute             (fresh ExecutionScope over a shared Namespace)
//! ```
//!
//! The script interpreter, the filesystem and the process environment are
//! collaborators: see [`Evaluator`] and [`Host`].

mod cache;
mod config;
mod error;
pub mod extension;
mod host;
mod input;
mod loader;
pub mod path;
mod scope;
mod search_path;

pub use cache::LoadCache;
pub use config::LoaderConfig;
pub use error::{ErrorKind, LoaderError};
pub use host::{Host, OsHost};
pub use input::{Identifier, Input};
pub use loader::Loader;
pub use path::PathShape;
pub use scope::{Evaluator, ExecutionScope, Namespace, Shared};
pub use search_path::{SearchEntry, SearchPaths};
