//! State resolution: decide which edit turns the file into the desired state.
//!
//! The first assignment of the target variable is authoritative. Later
//! duplicates are left alone, except that `absent` removes every one of them.

use tracing::{debug, warn};

use crate::document::EnvFile;
use crate::error::EnvFileError;
use crate::request::{DesiredState, State};

/// The edit required to reach the desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
  /// The file already matches.
  NoOp,
  /// Rewrite line `index` in canonical form.
  UpdateAt { index: usize, value: String, exported: bool },
  /// Add a new assignment at the end of the file.
  AppendNew { name: String, value: String, exported: bool },
  /// Delete these lines.
  RemoveAll(Vec<usize>),
  /// Flip the `export` prefix of line `index`, keeping its value text.
  ChangeScopeAt { index: usize, exported: bool },
}

impl EditAction {
  pub fn is_noop(&self) -> bool {
    matches!(self, EditAction::NoOp)
  }

  /// Short description of what the action does.
  pub fn message(&self) -> Option<&'static str> {
    match self {
      EditAction::NoOp => None,
      EditAction::UpdateAt { .. } => Some("var changed"),
      EditAction::AppendNew { .. } => Some("var added"),
      EditAction::RemoveAll(_) => Some("var removed"),
      EditAction::ChangeScopeAt { .. } => Some("var scope changed"),
    }
  }
}

/// What a state means for an assignment.
enum Policy {
  Remove,
  Assign {
    /// Scope forced onto an existing line; `None` keeps whatever it has.
    force_export: Option<bool>,
    /// Scope of a newly appended line.
    new_export: bool,
  },
}

const fn policy(state: State) -> Policy {
  match state {
    State::Absent => Policy::Remove,
    State::Present => Policy::Assign {
      force_export: None,
      new_export: true,
    },
    State::Exported => Policy::Assign {
      force_export: Some(true),
      new_export: true,
    },
    State::Local => Policy::Assign {
      force_export: Some(false),
      new_export: false,
    },
  }
}

/// Compute the edit that brings `file` to `desired`.
///
/// Fails only when a new variable would have to be created without a value.
pub fn resolve(file: &EnvFile, desired: &DesiredState) -> Result<EditAction, EnvFileError> {
  let name = desired.var();

  let (force_export, new_export) = match policy(desired.state()) {
    Policy::Remove => {
      if desired.value().is_some() {
        warn!(var = %name, "value is ignored when state is absent");
      }
      let indices = file.assignment_indices(name);
      debug!(var = %name, matches = indices.len(), "resolving removal");
      return Ok(if indices.is_empty() {
        EditAction::NoOp
      } else {
        EditAction::RemoveAll(indices)
      });
    }
    Policy::Assign {
      force_export,
      new_export,
    } => (force_export, new_export),
  };

  let Some((index, current)) = file.first_assignment(name) else {
    let value = desired.value().ok_or_else(|| EnvFileError::MissingValue {
      var: name.to_string(),
      state: desired.state(),
    })?;
    debug!(var = %name, exported = new_export, "variable not present, appending");
    return Ok(EditAction::AppendNew {
      name: name.to_string(),
      value: value.to_string(),
      exported: new_export,
    });
  };

  let duplicates = file.assignment_indices(name).len();
  if duplicates > 1 {
    warn!(var = %name, count = duplicates, line = index + 1, "variable assigned more than once, editing the first");
  }

  let exported = force_export.unwrap_or(current.exported);
  let new_value = desired.value().filter(|v| *v != current.value);

  let action = match new_value {
    Some(value) => EditAction::UpdateAt {
      index,
      value: value.to_string(),
      exported,
    },
    None if exported != current.exported => EditAction::ChangeScopeAt { index, exported },
    None => EditAction::NoOp,
  };
  debug!(var = %name, line = index + 1, ?action, "resolved edit");
  Ok(action)
}
