//! Apply an edit request to a file on disk.
//!
//! The request is carried through the whole pipeline in one pass:
//!
//! 1. Load the file (or start empty if it is missing and creation is allowed)
//! 2. Resolve the edit action against the desired state
//! 3. Rewrite the in-memory lines
//! 4. Back up the original if requested, then write the result atomically
//! 5. Bring file attributes in line
//!
//! Every validation and resolution error is raised before step 4, so a failed
//! run never leaves a partial edit behind.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::attrs::apply_attributes;
use crate::error::EnvFileError;
use crate::materialize;
use crate::request::EditRequest;
use crate::resolve::{EditAction, resolve};
use crate::rewrite::rewrite;

/// File content before and after the edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
  pub before: String,
  pub after: String,
}

impl Diff {
  /// The differing region as (removed lines, added lines).
  ///
  /// Edits touch a contiguous stretch of the file in the common case, so the
  /// shared prefix and suffix are trimmed and whatever is left is reported.
  pub fn hunk(&self) -> (Vec<&str>, Vec<&str>) {
    let before: Vec<&str> = self.before.lines().collect();
    let after: Vec<&str> = self.after.lines().collect();

    let prefix = before.iter().zip(&after).take_while(|(a, b)| a == b).count();
    let suffix = before[prefix..]
      .iter()
      .rev()
      .zip(after[prefix..].iter().rev())
      .take_while(|(a, b)| a == b)
      .count();

    (
      before[prefix..before.len() - suffix].to_vec(),
      after[prefix..after.len() - suffix].to_vec(),
    )
  }
}

/// Outcome of a single run.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
  pub path: PathBuf,
  /// True if the content or the attributes changed (or would, in check mode).
  pub changed: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub msg: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub backup_file: Option<PathBuf>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub diff: Option<Diff>,
  /// Final file content, as written (or as it would be written).
  #[serde(skip)]
  pub content: String,
  #[serde(skip)]
  pub action: EditAction,
}

/// Run the full pipeline for `request`.
pub fn apply(request: &EditRequest) -> Result<ApplyResult, EnvFileError> {
  let path = &request.path;
  let options = &request.options;
  let desired = &request.desired;

  info!(
    path = %path.display(),
    var = %desired.var(),
    state = %desired.state(),
    check = options.check,
    "applying"
  );

  let loaded = materialize::load(path, options.create)?;
  let action = resolve(&loaded.file, desired)?;
  let content = rewrite(&loaded.file, &action).render();

  let content_changed = content != loaded.before();
  debug!(path = %path.display(), ?action, content_changed, "edit computed");

  let mut backup_file = None;
  if content_changed && !options.check {
    if options.backup && loaded.existed() {
      backup_file = Some(materialize::backup(path)?);
    }
    if !loaded.existed() {
      materialize::ensure_parent_dir(path)?;
    }
    materialize::write_atomic(path, &content)?;
  }

  // A missing file that stays missing has no attributes to manage.
  let exists = loaded.existed() || (content_changed && !options.check);
  let attrs_changed = exists && apply_attributes(path, &request.attributes, options.check)?;

  let diff = options.diff.then(|| Diff {
    before: loaded.before().to_string(),
    after: content.clone(),
  });

  Ok(ApplyResult {
    path: path.clone(),
    changed: content_changed || attrs_changed,
    msg: action.message(),
    backup_file,
    diff,
    content,
    action,
  })
}
