//! envedit-lib: idempotent, format-preserving edits to shell environment files
//!
//! Files of `VAR=VALUE` / `export VAR=VALUE` lines are edited through a pure
//! pipeline plus one side-effecting stage:
//! - `line`: classify each raw line (comment, blank, assignment, opaque)
//! - `resolve`: decide the edit that reaches the desired state
//! - `rewrite`: apply it, touching only the affected lines
//! - `materialize`: read, back up, and atomically write the file
//!
//! [`apply::apply`] runs the whole thing for an [`request::EditRequest`].

pub mod apply;
pub mod attrs;
pub mod document;
pub mod error;
pub mod line;
pub mod materialize;
pub mod request;
pub mod resolve;
pub mod rewrite;

pub use apply::{ApplyResult, Diff, apply};
pub use document::EnvFile;
pub use error::{EnvFileError, ErrorKind};
pub use request::{ApplyOptions, DesiredState, EditRequest, Params, State};
pub use resolve::EditAction;
