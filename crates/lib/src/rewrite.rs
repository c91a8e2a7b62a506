//! Apply an [`EditAction`] to an [`EnvFile`].
//!
//! Only the lines named by the action change. New and updated assignments are
//! written in canonical form: `export VAR=VALUE` or `VAR=VALUE`, with VALUE
//! double-quoted only when it needs to be.

use std::borrow::Cow;

use crate::document::EnvFile;
use crate::line::Line;
use crate::resolve::EditAction;

/// Produce the edited file. The input is left untouched.
pub fn rewrite(file: &EnvFile, action: &EditAction) -> EnvFile {
  let mut lines = file.lines().to_vec();
  let mut trailing_newline = file.has_trailing_newline();

  match action {
    EditAction::NoOp => return file.clone(),
    EditAction::UpdateAt { index, value, exported } => {
      if let Some(a) = lines[*index].assignment() {
        lines[*index] = Line::classify(&canonical_line(&a.name, value, *exported));
      }
    }
    EditAction::AppendNew { name, value, exported } => {
      lines.push(Line::classify(&canonical_line(name, value, *exported)));
      trailing_newline = true;
    }
    EditAction::RemoveAll(indices) => {
      // Every remaining line was newline-terminated if the old last line goes.
      if indices.last().is_some_and(|&i| i + 1 == lines.len()) {
        trailing_newline = true;
      }
      let mut index = 0;
      lines.retain(|_| {
        let keep = !indices.contains(&index);
        index += 1;
        keep
      });
    }
    EditAction::ChangeScopeAt { index, exported } => {
      if let Some(a) = lines[*index].assignment() {
        let prefix = if *exported { "export " } else { "" };
        let raw = format!("{}{}{}={}", a.format.indent, prefix, a.name, a.format.raw_value);
        lines[*index] = Line::classify(&raw);
      }
    }
  }

  EnvFile::from_parts(lines, trailing_newline)
}

/// Canonical text of an assignment line.
pub fn canonical_line(name: &str, value: &str, exported: bool) -> String {
  let prefix = if exported { "export " } else { "" };
  format!("{prefix}{name}={}", quote_value(value))
}

/// Quote `value` for the right-hand side of an assignment, if needed.
pub fn quote_value(value: &str) -> Cow<'_, str> {
  if !value.chars().any(needs_quoting) {
    return Cow::Borrowed(value);
  }

  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    if matches!(c, '"' | '\\' | '$' | '`') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  Cow::Owned(out)
}

fn needs_quoting(c: char) -> bool {
  c.is_whitespace()
    || matches!(
      c,
      '|' | '&' | ';' | '<' | '>' | '(' | ')' | '$' | '`' | '\\' | '"' | '\'' | '*' | '?' | '[' | ']' | '#' | '~'
        | '{' | '}' | '!'
    )
}
