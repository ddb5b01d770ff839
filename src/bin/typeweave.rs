//! typeweave: mixin composition for compiled type libraries
//!
//! ## Commands
//!
//! - **merge**: discover mixins below an output root and merge them into their targets
//! - **pack**: pack a compiled module directory into a module archive
//! - **describe**: print the library descriptor of a module archive
//! - **inspect**: print a compiled type (or an archive's type list) as JSON
//! - **assemble**: encode a JSON type definition into a type file
//!
//! ## Example Usage
//!
//! ```bash
//! # Merge mixins declared under out/def, with two library modules on the classpath
//! typeweave merge --out out --classpath libs/dom.twar --classpath libs/jquery.twar
//!
//! # Same, printing the run report as JSON
//! typeweave --json merge --out out --classpath libs/dom.twar
//!
//! # Package a module and read its descriptor back
//! typeweave pack build/jquery jquery.twar
//! typeweave describe jquery.twar
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod typeweave_cli;

use typeweave_cli::{
    assemble::AssembleCmd,
    describe::DescribeCmd,
    inspect::InspectCmd,
    logging::{init_logging, LogFormat},
    merge::MergeCmd,
    pack::PackCmd,
};

#[derive(Parser)]
#[command(
    name = "typeweave",
    author,
    version,
    about = "Mixin composition for compiled type libraries",
    long_about = "Merges declared mixin types into their target types across independently\n\
                  compiled library modules, and unions well-known utility types."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge mixins into their targets and union builtin utility types
    Merge(MergeCmd),

    /// Pack a compiled module directory into a module archive
    Pack(PackCmd),

    /// Print the library descriptor of a module archive
    Describe(DescribeCmd),

    /// Print a compiled type file (or a type inside an archive) as JSON
    Inspect(InspectCmd),

    /// Encode a JSON type definition into a compiled type file
    Assemble(AssembleCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
        log_format,
    } = Cli::parse();

    init_logging(verbose, log_format)?;

    match command {
        Commands::Merge(cmd) => cmd.execute(json),
        Commands::Pack(cmd) => cmd.execute(json),
        Commands::Describe(cmd) => cmd.execute(json),
        Commands::Inspect(cmd) => cmd.execute(),
        Commands::Assemble(cmd) => cmd.execute(),
    }
}
