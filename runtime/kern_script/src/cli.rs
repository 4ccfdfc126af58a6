//! Command-line handling for the `kern` runner.
//!
//! ```text
//! kern [-I DIR]... [-r FEATURE]... [-v] [-e CODE | FILE]
//! ```
//!
//! Arguments are parsed by hand. `-I` directories come first in the search
//! list, followed by the entries of `KERN_LOAD_PATH`.

use std::io;

use kern_load::path::classify;
use kern_load::{Loader, LoaderError, SearchPaths};

use crate::error::ScriptError;
use crate::interpreter::{Interpreter, INLINE_PATH};
use crate::output::SharedOutput;

/// Environment variable holding extra search directories.
pub const LOAD_PATH_ENV: &str = "KERN_LOAD_PATH";

/// Separator between directories in [`LOAD_PATH_ENV`].
pub const LOAD_PATH_SEPARATOR: char = ':';

/// Path reported for a program read from stdin.
pub const STDIN_PATH: &str = "-";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Program {
    /// Run with `load` semantics.
    File(String),
    /// `-e` code; several `-e` flags are joined by newlines.
    Inline(String),
    Stdin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub include: Vec<String>,
    pub requires: Vec<String>,
    pub program: Program,
    pub verbose: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("option '{0}' needs a value")]
    MissingValue(&'static str),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Parse arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut include = Vec::new();
    let mut requires = Vec::new();
    let mut inline: Vec<String> = Vec::new();
    let mut file = None;
    let mut verbose = false;
    let mut options_done = false;

    while let Some(arg) = args.next() {
        if options_done || !arg.starts_with('-') || arg == "-" {
            if file.is_some() || !inline.is_empty() {
                return Err(UsageError::UnexpectedArgument(arg));
            }
            file = Some(arg);
            continue;
        }

        match arg.as_str() {
            "--" => options_done = true,
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "-v" | "--verbose" => verbose = true,
            "-I" => include.push(args.next().ok_or(UsageError::MissingValue("-I"))?),
            "-r" => requires.push(args.next().ok_or(UsageError::MissingValue("-r"))?),
            "-e" => {
                if file.is_some() {
                    return Err(UsageError::UnexpectedArgument(arg));
                }
                inline.push(args.next().ok_or(UsageError::MissingValue("-e"))?);
            }
            // attached values: -Ilib, -rset
            _ if arg.starts_with("-I") => include.push(arg[2..].to_owned()),
            _ if arg.starts_with("-r") => requires.push(arg[2..].to_owned()),
            _ => return Err(UsageError::UnknownOption(arg)),
        }
    }

    let program = match file {
        Some(path) if path == STDIN_PATH => Program::Stdin,
        Some(path) => Program::File(path),
        None if !inline.is_empty() => Program::Inline(inline.join("\n")),
        None => Program::Stdin,
    };

    Ok(Command::Run(Options {
        include,
        requires,
        program,
        verbose,
    }))
}

/// Search list for the runner: `-I` directories, then `KERN_LOAD_PATH`.
pub fn search_paths(include: &[String], env_load_path: Option<&str>) -> SearchPaths {
    let from_env = env_load_path
        .into_iter()
        .flat_map(|value| value.split(LOAD_PATH_SEPARATOR))
        .filter(|dir| !dir.is_empty())
        .map(str::to_owned);
    SearchPaths::from_dirs(include.iter().cloned().chain(from_env))
}

/// Run a parsed command line: required features first, then the program.
pub fn run(
    options: &Options,
    env_load_path: Option<&str>,
    output: SharedOutput,
) -> Result<(), ScriptError> {
    let mut loader =
        Loader::new().with_search_paths(search_paths(&options.include, env_load_path));
    let mut interp = Interpreter::with_output(output);
    interp.seed_load_path(&loader);

    for feature in &options.requires {
        interp.require_feature(&mut loader, feature)?;
    }

    match &options.program {
        Program::File(path) => {
            interp.load_file(&mut loader, &program_path(path))?;
        }
        Program::Inline(code) => interp.run_inline(&mut loader, INLINE_PATH, code)?,
        Program::Stdin => {
            let code = io::read_to_string(io::stdin()).map_err(|source| LoaderError::Io {
                path: STDIN_PATH.to_owned(),
                source,
            })?;
            interp.run_inline(&mut loader, STDIN_PATH, &code)?;
        }
    }

    tracing::debug!(files = loader.loaded_paths().len(), "finished");
    Ok(())
}

/// The program file is always relative to the current directory, never
/// looked up on the search path.
pub fn program_path(path: &str) -> String {
    if classify(path).is_implicit() {
        format!("./{path}")
    } else {
        path.to_owned()
    }
}
