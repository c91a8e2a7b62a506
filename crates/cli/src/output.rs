//! CLI output formatting utilities.
//!
//! Renders edit results as colored status lines or JSON.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use envedit_lib::ApplyResult;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const REMOVE: &str = "-";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// One-line summary of a result.
pub fn summary(result: &ApplyResult, check: bool) -> String {
  let path = result.path.display();
  match (result.changed, result.msg, check) {
    (false, _, _) => format!("{}: unchanged", path),
    (true, Some(msg), false) => format!("{}: {}", path, msg),
    (true, Some(msg), true) => format!("{}: {} (check mode, not written)", path, msg),
    (true, None, false) => format!("{}: attributes changed", path),
    (true, None, true) => format!("{}: attributes would change (check mode)", path),
  }
}

/// Print a result in the requested format.
pub fn print_result(result: &ApplyResult, format: OutputFormat, check: bool) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(result);
  }

  let line = summary(result, check);
  if result.changed {
    print_success(&line);
  } else {
    print_info(&line);
  }

  if let Some(backup) = &result.backup_file {
    print_stat("backup", &backup.display().to_string());
  }

  if let Some(diff) = &result.diff {
    let (removed, added) = diff.hunk();
    for line in removed {
      println!(
        "    {}",
        format!("{} {}", symbols::REMOVE, line).if_supports_color(Stream::Stdout, |s| s.red())
      );
    }
    for line in added {
      println!(
        "    {}",
        format!("{} {}", symbols::ADD, line).if_supports_color(Stream::Stdout, |s| s.green())
      );
    }
  }

  Ok(())
}
