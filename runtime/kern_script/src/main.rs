//! Kern runner.

use std::io::IsTerminal;
use std::process::ExitCode;

use kern_script::cli::{self, Command, LOAD_PATH_ENV};
use kern_script::diagnostic::render;
use kern_script::Output;

fn main() -> ExitCode {
    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let options = match command {
        Command::Run(options) => options,
        Command::Help => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("kern {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(options.verbose);

    let env_load_path = std::env::var(LOAD_PATH_ENV).ok();
    match cli::run(&options, env_load_path.as_deref(), Output::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", render(&err, std::io::stderr().is_terminal()));
            ExitCode::FAILURE
        }
    }
}

/// Install a hierarchical subscriber when logging was asked for: `-v`
/// forces `debug`, otherwise only if `RUST_LOG` is set.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true),
        )
        .init();
}

fn print_usage() {
    eprintln!("Kern script runner");
    eprintln!();
    eprintln!("Usage: kern [options] [-e CODE | FILE | -]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -I DIR          Add DIR to the search path (repeatable)");
    eprintln!("  -r FEATURE      Require FEATURE before running (repeatable)");
    eprintln!("  -e CODE         Run CODE instead of a file (repeatable)");
    eprintln!("  -v, --verbose   Log resolution at debug level");
    eprintln!("  -h, --help      Show this help");
    eprintln!("  --version       Show the version");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {LOAD_PATH_ENV}  Colon-separated directories searched after -I");
    eprintln!("  RUST_LOG        Log filter, e.g. kern_load=trace");
}
