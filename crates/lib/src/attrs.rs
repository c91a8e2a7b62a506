//! File attribute management (mode, owner, group).
//!
//! Runs after the content has been materialized and only touches metadata.
//! On non-Unix platforms the attributes are accepted but ignored.

use std::path::Path;

use crate::error::{EnvFileError, Phase};

/// Requested metadata for the target file. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
  /// Permission bits, e.g. `0o644`.
  pub mode: Option<u32>,
  /// Numeric owner uid.
  pub owner: Option<u32>,
  /// Numeric group gid.
  pub group: Option<u32>,
}

impl FileAttributes {
  pub fn is_empty(&self) -> bool {
    self.mode.is_none() && self.owner.is_none() && self.group.is_none()
  }
}

/// Parse an octal mode string such as `644`, `0644` or `0o644`.
pub fn parse_mode(s: &str) -> Result<u32, EnvFileError> {
  let digits = s.strip_prefix("0o").unwrap_or(s);
  match u32::from_str_radix(digits, 8) {
    Ok(mode) if !digits.is_empty() && mode <= 0o7777 => Ok(mode),
    _ => Err(EnvFileError::InvalidMode(s.to_string())),
  }
}

/// Bring the metadata of `path` in line with `attrs`.
///
/// Returns whether anything differed. With `check` set, differences are
/// reported but not fixed.
#[cfg(unix)]
pub fn apply_attributes(path: &Path, attrs: &FileAttributes, check: bool) -> Result<bool, EnvFileError> {
  use std::fs;
  use std::os::unix::fs::{MetadataExt, PermissionsExt};
  use tracing::info;

  if attrs.is_empty() {
    return Ok(false);
  }

  let meta = fs::metadata(path).map_err(|e| EnvFileError::io(Phase::Attributes, path, e))?;
  let mut changed = false;

  if let Some(mode) = attrs.mode {
    let current = meta.mode() & 0o7777;
    if current != mode {
      info!(
        path = %path.display(),
        from = %format_args!("{current:04o}"),
        to = %format_args!("{mode:04o}"),
        "changing mode"
      );
      if !check {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
          .map_err(|e| EnvFileError::io(Phase::Attributes, path, e))?;
      }
      changed = true;
    }
  }

  let owner = attrs.owner.filter(|&uid| uid != meta.uid());
  let group = attrs.group.filter(|&gid| gid != meta.gid());
  if owner.is_some() || group.is_some() {
    info!(path = %path.display(), ?owner, ?group, "changing ownership");
    if !check {
      std::os::unix::fs::chown(path, owner, group).map_err(|e| EnvFileError::io(Phase::Attributes, path, e))?;
    }
    changed = true;
  }

  Ok(changed)
}

#[cfg(not(unix))]
pub fn apply_attributes(path: &Path, attrs: &FileAttributes, _check: bool) -> Result<bool, EnvFileError> {
  use tracing::debug;

  if !attrs.is_empty() {
    debug!(path = %path.display(), "file attributes are not supported on this platform, ignoring");
  }
  Ok(false)
}
