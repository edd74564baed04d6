//! sluice command-line tool.
//!
//! Moves bytes between files and the standard streams through sluice
//! buffers. Every stream failure is reported as its status text on stderr,
//! and the process exits with the numeric status code.
//!
//! # Quick Start
//!
//! ```bash
//! # Echo one read of stdin back to stdout
//! printf 'hello' | sluice echo
//!
//! # Concatenate files
//! sluice cat a.txt b.txt
//!
//! # Append stdin to a file
//! date | sluice write --append log.txt
//!
//! # Show bytes 2..5 of a file
//! sluice peek notes.txt --offset 2 --length 3
//! ```

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sluice_io::{Error, standard, stream_println};
use sluice_status::status_string;
use tracing_subscriber::EnvFilter;

/// sluice - copy bytes between files and standard streams.
#[derive(Parser)]
#[command(name = "sluice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (TOML), layered over `sluice.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bytes moved per buffer (overrides configuration).
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read once from stdin and write what was read to stdout.
    Echo,

    /// Copy files (or `-` for stdin) to stdout.
    Cat {
        /// Sources to copy, in order. Defaults to stdin.
        paths: Vec<PathBuf>,
    },

    /// Copy stdin into a file.
    ///
    /// Without --append the input overwrites the file from its start. The
    /// file is not truncated, so bytes past the end of a shorter input stay.
    Write {
        /// Destination file.
        path: PathBuf,

        /// Append instead of writing from the start of the file.
        #[arg(short, long)]
        append: bool,

        /// Fail if the file does not exist.
        #[arg(long)]
        no_create: bool,
    },

    /// Print bytes from a position in a file.
    Peek {
        /// File to read.
        path: PathBuf,

        /// Distance from the start (or from the end with --from-end).
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Measure the offset backward from the end of the file.
        #[arg(long)]
        from_end: bool,

        /// Maximum bytes to print (defaults to the chunk size).
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        length: Option<u64>,
    },

    /// Describe a status code (decimal or 0x-prefixed hex).
    Status {
        /// Status code value.
        code: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sluice: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(chunk_size) = cli.chunk_size {
        config.transfer.chunk_size = usize::try_from(chunk_size).unwrap_or(usize::MAX);
    }

    init_logging(&config.log.level);

    if let Err(error) = standard::init() {
        eprintln!("sluice: {}", status_text(error));
        return exit_code(error);
    }

    let result = match cli.command {
        Commands::Echo => commands::echo::run(&config.transfer),
        Commands::Cat { paths } => commands::cat::run(&paths, &config.transfer),
        Commands::Write {
            path,
            append,
            no_create,
        } => commands::write::run(&path, append, !no_create, &config.transfer),
        Commands::Peek {
            path,
            offset,
            from_end,
            length,
        } => commands::peek::run(&path, offset, from_end, length, &config.transfer),
        Commands::Status { code } => commands::status::run(&code),
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    };

    if let Err(error) = standard::shutdown() {
        tracing::warn!(%error, "failed to close standard streams");
    }
    code
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints a failure through the stderr stream and picks the exit code.
fn report(error: &anyhow::Error) -> ExitCode {
    let status = error.downcast_ref::<Error>().copied();

    let message = match status {
        Some(status) => match error.chain().nth(1) {
            // Context was attached: keep it in front of the status text.
            Some(_) => format!("{error}: {}", status_text(status)),
            None => status_text(status),
        },
        None => format!("{error:#}"),
    };

    let printed = standard::with(|streams| stream_println!(streams.stderr, "sluice: {message}"));
    if !matches!(printed, Ok(Ok(_))) {
        eprintln!("sluice: {message}");
    }

    match status {
        Some(status) => exit_code(status),
        None => ExitCode::FAILURE,
    }
}

/// Status text for a failure. System errors describe their own errno rather
/// than whatever the calling thread captured last.
fn status_text(error: Error) -> String {
    match error {
        Error::System { .. } => error.to_string(),
        _ => status_string(error.code()).into_owned(),
    }
}

fn exit_code(error: Error) -> ExitCode {
    ExitCode::from(u8::try_from(error.code().value()).unwrap_or(u8::MAX))
}
