//! Error types for envedit-lib.
//!
//! Every failure is reported as an [`EnvFileError`]. Callers that only care
//! about the broad category (to pick an exit code, say) use
//! [`EnvFileError::kind`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::request::State;

/// Broad failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The target does not exist and creation was not allowed.
  NotFound,
  /// The filesystem refused access during some phase.
  PermissionDenied,
  /// The request itself is malformed; nothing was touched.
  InvalidInput,
  /// The existing file could not be read.
  ReadFailure,
  /// A backup, write, or attribute change could not complete.
  WriteFailure,
}

/// Filesystem phase an I/O error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Read,
  CreateDir,
  Backup,
  Write,
  Attributes,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Phase::Read => "reading",
      Phase::CreateDir => "creating parent directory of",
      Phase::Backup => "backing up",
      Phase::Write => "writing",
      Phase::Attributes => "setting attributes on",
    };
    f.write_str(s)
  }
}

/// Errors that can occur while editing an environment file.
#[derive(Debug, Error)]
pub enum EnvFileError {
  #[error("target file does not exist: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("permission denied {phase} '{}': {source}", path.display())]
  PermissionDenied {
    phase: Phase,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid variable name '{0}': expected [A-Za-z_][A-Za-z0-9_]*")]
  InvalidName(String),

  #[error("invalid value for '{0}': values must fit on a single line")]
  InvalidValue(String),

  #[error("invalid state '{0}': expected one of absent, present, exported, local")]
  InvalidState(String),

  #[error("invalid file mode '{0}': expected an octal permission value such as 0644")]
  InvalidMode(String),

  #[error("no value given for new variable '{var}' (state={state})")]
  MissingValue { var: String, state: State },

  #[error("missing required parameter: {0}")]
  MissingParameter(&'static str),

  #[error("failed to parse parameters file '{}': {source}", path.display())]
  InvalidParams {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("path is a directory: {}", path.display())]
  IsDirectory { path: PathBuf },

  #[error("file is not valid UTF-8: {}", path.display())]
  NotUtf8 { path: PathBuf },

  #[error("failed to read '{}': {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to create parent directory for '{}': {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to back up '{}': {source}", path.display())]
  Backup {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write '{}': {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to set attributes on '{}': {source}", path.display())]
  Attributes {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl EnvFileError {
  /// Wrap an I/O error raised while operating on `path` during `phase`.
  ///
  /// Permission failures are always reported as
  /// [`EnvFileError::PermissionDenied`], whatever the phase.
  pub(crate) fn io(phase: Phase, path: &Path, source: io::Error) -> Self {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::PermissionDenied {
      return EnvFileError::PermissionDenied { phase, path, source };
    }
    match phase {
      Phase::Read => EnvFileError::Read { path, source },
      Phase::CreateDir => EnvFileError::CreateDir { path, source },
      Phase::Backup => EnvFileError::Backup { path, source },
      Phase::Write => EnvFileError::Write { path, source },
      Phase::Attributes => EnvFileError::Attributes { path, source },
    }
  }

  /// The category this error belongs to.
  pub fn kind(&self) -> ErrorKind {
    match self {
      EnvFileError::NotFound { .. } => ErrorKind::NotFound,
      EnvFileError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
      EnvFileError::InvalidName(_)
      | EnvFileError::InvalidValue(_)
      | EnvFileError::InvalidState(_)
      | EnvFileError::InvalidMode(_)
      | EnvFileError::MissingValue { .. }
      | EnvFileError::MissingParameter(_)
      | EnvFileError::InvalidParams { .. }
      | EnvFileError::IsDirectory { .. }
      | EnvFileError::NotUtf8 { .. } => ErrorKind::InvalidInput,
      EnvFileError::Read { .. } => ErrorKind::ReadFailure,
      EnvFileError::CreateDir { .. }
      | EnvFileError::Backup { .. }
      | EnvFileError::Write { .. }
      | EnvFileError::Attributes { .. } => ErrorKind::WriteFailure,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn permission_errors_map_to_permission_denied_in_every_phase() {
    for phase in [Phase::Read, Phase::CreateDir, Phase::Backup, Phase::Write, Phase::Attributes] {
      let err = EnvFileError::io(
        phase,
        Path::new("/etc/environment"),
        io::Error::from(io::ErrorKind::PermissionDenied),
      );
      assert_eq!(err.kind(), ErrorKind::PermissionDenied, "phase {phase:?}");
    }
  }

  #[test]
  fn other_io_errors_keep_their_phase() {
    let err = EnvFileError::io(Phase::Read, Path::new("x"), io::Error::other("boom"));
    assert_eq!(err.kind(), ErrorKind::ReadFailure);

    let err = EnvFileError::io(Phase::Backup, Path::new("x"), io::Error::other("boom"));
    assert!(matches!(err, EnvFileError::Backup { .. }));
    assert_eq!(err.kind(), ErrorKind::WriteFailure);
  }

  #[test]
  fn message_names_the_phase_and_path() {
    let err = EnvFileError::io(
      Phase::Write,
      Path::new("/etc/profile.d/app.sh"),
      io::Error::from(io::ErrorKind::PermissionDenied),
    );
    let msg = err.to_string();
    assert!(msg.contains("writing"));
    assert!(msg.contains("/etc/profile.d/app.sh"));
  }
}
