//! Implementation of the `envedit plan` command.
//!
//! A dry run of `apply` that always shows the diff.

use anyhow::Result;

use envedit_lib::apply;

use super::EditArgs;
use crate::output::print_result;

pub fn cmd_plan(args: &EditArgs) -> Result<()> {
  let mut request = args.to_request()?;
  request.options.check = true;
  request.options.diff = true;

  let result = apply(&request)?;
  print_result(&result, args.format, true)
}
