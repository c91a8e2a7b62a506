//! Reading environment files from disk and writing them back.
//!
//! This is the only part of the pipeline with side effects. Writes go to a
//! temporary file in the target's directory which is then renamed over the
//! target, so an interrupted run leaves either the old or the new content.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::document::EnvFile;
use crate::error::{EnvFileError, Phase};

/// Permission bits for files created from scratch.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Timestamp format used in backup file names.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d@%H:%M:%S";

/// A file as read from disk.
#[derive(Debug, Clone)]
pub struct Loaded {
  pub file: EnvFile,
  /// Original content, or `None` if the file did not exist.
  pub original: Option<String>,
}

impl Loaded {
  pub fn existed(&self) -> bool {
    self.original.is_some()
  }

  /// Original content, empty for a missing file.
  pub fn before(&self) -> &str {
    self.original.as_deref().unwrap_or("")
  }
}

/// Read `path` into an [`EnvFile`].
///
/// A missing file is an empty file when `create` is set and
/// [`EnvFileError::NotFound`] otherwise.
pub fn load(path: &Path, create: bool) -> Result<Loaded, EnvFileError> {
  if path.is_dir() {
    return Err(EnvFileError::IsDirectory {
      path: path.to_path_buf(),
    });
  }

  let bytes = match fs::read(path) {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      if !create {
        return Err(EnvFileError::NotFound {
          path: path.to_path_buf(),
        });
      }
      debug!(path = %path.display(), "file does not exist, starting empty");
      return Ok(Loaded {
        file: EnvFile::default(),
        original: None,
      });
    }
    Err(e) => return Err(EnvFileError::io(Phase::Read, path, e)),
  };

  let content = String::from_utf8(bytes).map_err(|_| EnvFileError::NotUtf8 {
    path: path.to_path_buf(),
  })?;
  let file = EnvFile::parse(&content);
  debug!(path = %path.display(), lines = file.len(), "loaded environment file");

  Ok(Loaded {
    file,
    original: Some(content),
  })
}

/// Copy `path` to a fresh sibling backup file and return the backup's path.
///
/// Backups are named `<file>.<pid>.<timestamp>~`. If that name is taken a
/// numeric suffix is added; an existing backup is never overwritten.
pub fn backup(path: &Path) -> Result<PathBuf, EnvFileError> {
  let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT);
  let base = format!("{}.{}.{}", path.display(), std::process::id(), stamp);

  let mut candidate = PathBuf::from(format!("{base}~"));
  let mut counter = 1;
  while candidate.exists() {
    candidate = PathBuf::from(format!("{base}.{counter}~"));
    counter += 1;
  }

  // create_new: a backup created since the exists() probe must survive
  let mut dest = fs::OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(&candidate)
    .map_err(|e| EnvFileError::io(Phase::Backup, path, e))?;
  let mut src = fs::File::open(path).map_err(|e| EnvFileError::io(Phase::Backup, path, e))?;
  io::copy(&mut src, &mut dest).map_err(|e| EnvFileError::io(Phase::Backup, path, e))?;
  dest.sync_all().map_err(|e| EnvFileError::io(Phase::Backup, path, e))?;

  if let Ok(meta) = fs::metadata(path) {
    fs::set_permissions(&candidate, meta.permissions()).map_err(|e| EnvFileError::io(Phase::Backup, path, e))?;
  }

  info!(path = %path.display(), backup = %candidate.display(), "backup created");
  Ok(candidate)
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<(), EnvFileError> {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
      info!(dir = %parent.display(), "creating parent directory");
      fs::create_dir_all(parent).map_err(|e| EnvFileError::io(Phase::CreateDir, path, e))
    }
    _ => Ok(()),
  }
}

/// Atomically replace the content of `path` with `content`.
///
/// An existing file keeps its permission bits.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), EnvFileError> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  let err = |e: io::Error| EnvFileError::io(Phase::Write, path, e);

  let mut temp = NamedTempFile::new_in(dir).map_err(err)?;
  temp.write_all(content.as_bytes()).map_err(err)?;
  temp.as_file().sync_all().map_err(err)?;

  match fs::metadata(path) {
    Ok(meta) => {
      fs::set_permissions(temp.path(), meta.permissions()).map_err(err)?;
      copy_ownership(temp.path(), &meta).map_err(err)?;
    }
    Err(_) => set_new_file_permissions(temp.path()).map_err(err)?,
  }

  temp.persist(path).map_err(|e| err(e.error))?;
  info!(path = %path.display(), bytes = content.len(), "file written");
  Ok(())
}

/// Give the replacement file the owner and group of the one it replaces.
///
/// Unprivileged callers cannot chown to another user; the file then keeps
/// the caller's ownership.
#[cfg(unix)]
fn copy_ownership(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
  use std::os::unix::fs::{MetadataExt, chown};

  match chown(path, Some(meta.uid()), Some(meta.gid())) {
    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
      debug!(path = %path.display(), uid = meta.uid(), gid = meta.gid(), "cannot preserve ownership");
      Ok(())
    }
    result => result,
  }
}

#[cfg(not(unix))]
fn copy_ownership(_path: &Path, _meta: &fs::Metadata) -> io::Result<()> {
  Ok(())
}

#[cfg(unix)]
fn set_new_file_permissions(path: &Path) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, fs::Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_path: &Path) -> io::Result<()> {
  Ok(())
}
