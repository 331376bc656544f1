//! find-dylib-name - resolve a library's runtime SONAME through the compiler
//!
//! Used at configure time to decide whether a dependency can be loaded
//! from the system or has to be bundled:
//!
//! ```text
//! $ find-dylib-name SDL2 cc -m64
//! libSDL2-2.0.so.0
//! ```

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use relayout::resolver::{find_dylib_name, ldconf_dirs, ResolveError, Resolution};
use relayout::util::diagnostic::emit;

mod cli;

use cli::Cli;

/// Exit status when the library is not on the search path.
const NOT_FOUND: u8 = 1;
/// Exit status when the lookup could not be completed.
const FAILED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("relayout=debug")
    } else if cli.quiet {
        EnvFilter::new("relayout=error")
    } else {
        EnvFilter::new("relayout=info")
    };

    // stdout carries only the answer
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(&cli) {
        Ok(Some(found)) => {
            println!("{}", found.soname);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(NOT_FOUND),
        Err(e) => {
            emit(&e.to_diagnostic(), std::io::stderr().is_terminal());
            ExitCode::from(FAILED)
        }
    }
}

fn run(cli: &Cli) -> Result<Option<Resolution>, ResolveError> {
    let extra_dirs = match &cli.ld_so_conf {
        Some(conf) => ldconf_dirs(conf)?,
        None => Vec::new(),
    };

    find_dylib_name(&cli.libname, &cli.compiler, &extra_dirs)
}
