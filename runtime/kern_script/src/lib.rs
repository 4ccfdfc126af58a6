//! Kern Script - a small scripting language driven by `kern_load`.
//!
//! Just enough language to exercise the loader end to end: locals,
//! constants, globals, arrays, and the `require`/`load`/`puts`/`raise`
//! builtins.
//!
//! ```text
//! source ─► lexer (logos) ─► parser ─► Program ─► Interpreter
//!                                                   │  ▲
//!                                      require/load ▼  │ evaluate
//!                                                 kern_load::Loader
//! ```

pub mod ast;
pub mod cli;
pub mod diagnostic;
mod error;
mod interpreter;
pub mod lexer;
mod output;
pub mod parser;
mod value;

pub use error::{ScriptError, SyntaxError};
pub use interpreter::{Interpreter, INLINE_PATH};
pub use lexer::LOAD_PATH;
pub use output::{Output, SharedOutput};
pub use value::Value;
