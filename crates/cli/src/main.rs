mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use envedit_lib::{EnvFileError, ErrorKind};

use cmd::{EditArgs, cmd_apply, cmd_plan};
use output::print_error;

/// envedit - idempotent edits to shell environment files
#[derive(Parser)]
#[command(name = "envedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Set, export, localize, or remove a variable
  Apply {
    #[command(flatten)]
    edit: EditArgs,

    /// Report what would change without writing anything
    #[arg(long)]
    check: bool,
  },

  /// Show what apply would change (dry-run with diff)
  Plan {
    #[command(flatten)]
    edit: EditArgs,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  // Initialize logging
  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match &cli.command {
    Commands::Apply { edit, check } => cmd_apply(edit, *check),
    Commands::Plan { edit } => cmd_plan(edit),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      exit_code(&err)
    }
  }
}

/// Process exit code for a failed run.
///
/// 2 is left to clap for usage errors.
fn exit_code(err: &anyhow::Error) -> ExitCode {
  let code = match err.downcast_ref::<EnvFileError>().map(EnvFileError::kind) {
    Some(ErrorKind::NotFound) => 3,
    Some(ErrorKind::PermissionDenied) => 4,
    Some(ErrorKind::InvalidInput) => 5,
    Some(ErrorKind::WriteFailure) => 6,
    Some(ErrorKind::ReadFailure) => 7,
    None => 1,
  };
  ExitCode::from(code)
}
