//! Command-line argument definition and processing.

use clap::{Parser, Subcommand, ValueEnum};

use clamward::status::ScanMode;

/// Clamward - ClamAV scan orchestration and host status reporting
#[derive(Parser, Debug)]
#[command(name = "clamward")]
#[command(version)]
#[command(about = "Runs ClamAV scans, installs pending updates and reports host status", long_about = None)]
pub struct Args {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Verb to run; defaults to `status` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Verbs accepted on the command line.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refresh definitions, handle package updates and run a malware scan
    Scan {
        /// Scan depth
        #[arg(value_enum, default_value_t = Depth::Quick)]
        depth: Depth,

        /// Count pending package updates without installing them
        #[arg(long)]
        no_upgrade: bool,
    },
    /// Show the status dashboard for this host
    Status,
}

/// Scan depth accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Depth {
    /// Home directories only, with file-size ceilings
    Quick,
    /// Home plus system areas, no ceilings
    Full,
}

impl From<Depth> for ScanMode {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Quick => Self::Quick,
            Depth::Full => Self::Full,
        }
    }
}

/// What: Dispatch the parsed command line to its handler.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Never returns; every verb exits the process itself.
///
/// Details:
/// - A bare `clamward` invocation behaves like `clamward status`.
/// - `--no-upgrade` inverts into the apply flag the scan pipeline takes.
pub fn process_args(args: &Args) -> ! {
    use crate::args::{scan, status};

    match &args.command {
        Some(Command::Scan { depth, no_upgrade }) => {
            scan::handle_scan((*depth).into(), !*no_upgrade);
        }
        Some(Command::Status) | None => status::handle_status(),
    }
}
