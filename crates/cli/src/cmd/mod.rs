mod apply;
mod plan;

pub use apply::cmd_apply;
pub use plan::cmd_plan;

use std::path::PathBuf;

use clap::Args;

use envedit_lib::{EditRequest, EnvFileError, Params};

use crate::output::OutputFormat;

/// Arguments shared by every command that edits a file.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
  /// Path to the environment file
  pub path: Option<PathBuf>,

  /// Variable name
  #[arg(long, visible_alias = "name")]
  pub var: Option<String>,

  /// Value to assign (pass '' for an explicitly empty value)
  #[arg(long, visible_alias = "val", allow_hyphen_values = true)]
  pub value: Option<String>,

  /// Desired state: absent, present, exported or local [default: present]
  #[arg(long)]
  pub state: Option<String>,

  /// Fail if the file does not exist instead of creating it
  #[arg(long)]
  pub no_create: bool,

  /// Keep a timestamped copy of the original before writing
  #[arg(long)]
  pub backup: bool,

  /// Octal permission bits for the file, e.g. 0644
  #[arg(long)]
  pub mode: Option<String>,

  /// Numeric owner uid for the file
  #[arg(long)]
  pub owner: Option<u32>,

  /// Numeric group gid for the file
  #[arg(long)]
  pub group: Option<u32>,

  /// Read parameters from a JSON file; flags override its fields
  #[arg(long, value_name = "FILE")]
  pub params: Option<PathBuf>,

  /// Show the lines that change
  #[arg(long)]
  pub diff: bool,

  /// Output format
  #[arg(long, value_enum, default_value_t)]
  pub format: OutputFormat,
}

impl EditArgs {
  /// Flags as request parameters; unset flags stay `None`.
  fn as_params(&self) -> Params {
    Params {
      path: self.path.clone(),
      create: self.no_create.then_some(false),
      backup: self.backup.then_some(true),
      var: self.var.clone(),
      val: self.value.clone(),
      state: self.state.clone(),
      mode: self.mode.clone(),
      owner: self.owner,
      group: self.group,
    }
  }

  /// Build the validated request from the parameters file (if any) and flags.
  pub fn to_request(&self) -> Result<EditRequest, EnvFileError> {
    let base = match &self.params {
      Some(path) => Params::load(path)?,
      None => Params::default(),
    };
    base.merge(self.as_params()).into_request()
  }
}
