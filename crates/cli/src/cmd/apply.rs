//! Implementation of the `envedit apply` command.
//!
//! Edits one variable in an environment file and reports whether anything
//! changed.

use anyhow::Result;
use tracing::debug;

use envedit_lib::apply;

use super::EditArgs;
use crate::output::print_result;

/// Execute the apply command.
///
/// With `check` set the file is left untouched and the result describes what
/// would have happened.
pub fn cmd_apply(args: &EditArgs, check: bool) -> Result<()> {
  let mut request = args.to_request()?;
  request.options.check = check;
  request.options.diff = args.diff;
  debug!(?request, "request built");

  let result = apply(&request)?;
  print_result(&result, args.format, check)
}
