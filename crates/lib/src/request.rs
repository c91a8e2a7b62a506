//! Edit requests and their validation.
//!
//! A request arrives as loosely-typed [`Params`] (from a JSON parameters file,
//! command-line flags, or both) and is validated into an [`EditRequest`] before
//! anything on disk is touched.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attrs::{FileAttributes, parse_mode};
use crate::error::{EnvFileError, Phase};
use crate::line::is_identifier;

/// Desired state of the target variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum State {
  /// No assignment of the variable remains.
  Absent,
  /// The variable is assigned; an existing export scope is kept.
  #[default]
  Present,
  /// The variable is assigned with an `export` prefix.
  Exported,
  /// The variable is assigned without an `export` prefix.
  Local,
}

impl State {
  pub fn as_str(&self) -> &'static str {
    match self {
      State::Absent => "absent",
      State::Present => "present",
      State::Exported => "exported",
      State::Local => "local",
    }
  }
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for State {
  type Err = EnvFileError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "absent" => Ok(State::Absent),
      "present" => Ok(State::Present),
      "exported" => Ok(State::Exported),
      "local" => Ok(State::Local),
      other => Err(EnvFileError::InvalidState(other.to_string())),
    }
  }
}

impl TryFrom<String> for State {
  type Error = EnvFileError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    s.parse()
  }
}

/// The (variable, value, state) triple an edit should achieve.
///
/// `value: None` means "leave the value alone"; `Some(String::new())` is an
/// explicit empty assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
  var: String,
  value: Option<String>,
  state: State,
}

impl DesiredState {
  /// Validate and build a desired state.
  ///
  /// Values must not contain a newline: the assignment has to stay on one line.
  pub fn new(var: impl Into<String>, value: Option<String>, state: State) -> Result<Self, EnvFileError> {
    let var = var.into();
    if !is_identifier(&var) {
      return Err(EnvFileError::InvalidName(var));
    }
    if value.as_deref().is_some_and(|v| v.contains('\n')) {
      return Err(EnvFileError::InvalidValue(var));
    }
    Ok(Self { var, value, state })
  }

  pub fn var(&self) -> &str {
    &self.var
  }

  pub fn value(&self) -> Option<&str> {
    self.value.as_deref()
  }

  pub fn state(&self) -> State {
    self.state
  }
}

/// Options controlling the read and write phases.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
  /// Create the file (and its parent directory) if it does not exist.
  pub create: bool,
  /// Copy the original file aside before overwriting it.
  pub backup: bool,
  /// Compute the outcome but leave the filesystem untouched.
  pub check: bool,
  /// Include before/after content in the result.
  pub diff: bool,
}

impl Default for ApplyOptions {
  fn default() -> Self {
    Self {
      create: true,
      backup: false,
      check: false,
      diff: false,
    }
  }
}

/// A fully validated request.
#[derive(Debug, Clone)]
pub struct EditRequest {
  pub path: PathBuf,
  pub desired: DesiredState,
  pub options: ApplyOptions,
  pub attributes: FileAttributes,
}

/// Unvalidated request parameters.
///
/// Field names follow the automation-module convention (`var`, `val`, ...),
/// with the usual aliases accepted when read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
  pub path: Option<PathBuf>,
  pub create: Option<bool>,
  pub backup: Option<bool>,
  #[serde(alias = "name", alias = "variable")]
  pub var: Option<String>,
  #[serde(alias = "value", alias = "content")]
  pub val: Option<String>,
  pub state: Option<String>,
  pub mode: Option<String>,
  pub owner: Option<u32>,
  pub group: Option<u32>,
}

impl Params {
  /// Load parameters from a JSON file.
  pub fn load(path: &Path) -> Result<Self, EnvFileError> {
    let content = fs::read_to_string(path).map_err(|e| EnvFileError::io(Phase::Read, path, e))?;
    serde_json::from_str(&content).map_err(|source| EnvFileError::InvalidParams {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Overlay `other` on top of `self`; fields set in `other` win.
  pub fn merge(self, other: Params) -> Params {
    Params {
      path: other.path.or(self.path),
      create: other.create.or(self.create),
      backup: other.backup.or(self.backup),
      var: other.var.or(self.var),
      val: other.val.or(self.val),
      state: other.state.or(self.state),
      mode: other.mode.or(self.mode),
      owner: other.owner.or(self.owner),
      group: other.group.or(self.group),
    }
  }

  /// Validate into an [`EditRequest`], applying defaults.
  ///
  /// `check` and `diff` are run controls rather than request parameters and
  /// are filled in by the caller afterwards.
  pub fn into_request(self) -> Result<EditRequest, EnvFileError> {
    let path = self.path.ok_or(EnvFileError::MissingParameter("path"))?;
    let var = self.var.ok_or(EnvFileError::MissingParameter("var"))?;
    let state = match self.state {
      Some(s) => s.parse()?,
      None => State::default(),
    };
    let mode = self.mode.as_deref().map(parse_mode).transpose()?;

    Ok(EditRequest {
      path,
      desired: DesiredState::new(var, self.val, state)?,
      options: ApplyOptions {
        create: self.create.unwrap_or(true),
        backup: self.backup.unwrap_or(false),
        ..ApplyOptions::default()
      },
      attributes: FileAttributes {
        mode,
        owner: self.owner,
        group: self.group,
      },
    })
  }
}
