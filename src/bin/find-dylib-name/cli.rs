//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Print the versioned shared-object name the linker would use for a library
///
/// Exits 0 and prints e.g. `libSDL2-2.0.so.0` when found, exits 1 with no
/// output when not, exits 2 when the lookup itself fails.
#[derive(Parser)]
#[command(name = "find-dylib-name")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Also search the directories listed in this ld.so.conf-style file,
    /// after the compiler's own
    #[arg(long, value_name = "PATH")]
    pub ld_so_conf: Option<PathBuf>,

    /// Bare library name, as passed to `-l` (e.g. SDL2)
    pub libname: String,

    /// Compiler command line (program followed by its flags)
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub compiler: Vec<String>,
}
