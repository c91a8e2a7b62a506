//! Line classification.
//!
//! Every physical line of an environment file becomes a [`Line`]: a comment,
//! a blank, a recognized `VAR=VALUE` / `export VAR=VALUE` assignment, or an
//! opaque line that is carried through untouched.
//!
//! Classification is a pure function of the line text. The raw text is always
//! kept so that unchanged lines serialize byte-for-byte.

/// How the right-hand side of an assignment was quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
  Bare,
  Single,
  Double,
}

/// Formatting details needed to reproduce an assignment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
  /// Leading whitespace before the assignment (or before `export`).
  pub indent: String,
  /// Whitespace between `export` and the variable name. Empty when not exported.
  pub export_gap: String,
  /// Right-hand side exactly as written, quotes included.
  pub raw_value: String,
  pub quote: QuoteStyle,
}

/// A parsed `VAR=VALUE` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
  pub name: String,
  /// Decoded value: enclosing quotes removed, double-quote escapes resolved.
  pub value: String,
  pub exported: bool,
  pub format: Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
  Comment,
  Blank,
  Assignment(Assignment),
  Opaque,
}

/// One physical line, without its terminating newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
  raw: String,
  kind: LineKind,
}

impl Line {
  /// Classify a single line of text.
  pub fn classify(raw: &str) -> Self {
    let trimmed = raw.trim_start();
    let kind = if trimmed.is_empty() {
      LineKind::Blank
    } else if trimmed.starts_with('#') {
      LineKind::Comment
    } else {
      match parse_assignment(raw) {
        Some(assignment) => LineKind::Assignment(assignment),
        None => LineKind::Opaque,
      }
    };

    Self {
      raw: raw.to_string(),
      kind,
    }
  }

  pub fn raw(&self) -> &str {
    &self.raw
  }

  pub fn kind(&self) -> &LineKind {
    &self.kind
  }

  pub fn assignment(&self) -> Option<&Assignment> {
    match &self.kind {
      LineKind::Assignment(a) => Some(a),
      _ => None,
    }
  }

  /// True if this line assigns the variable `name`.
  pub fn assigns(&self, name: &str) -> bool {
    self.assignment().is_some_and(|a| a.name == name)
  }
}

/// Check shell identifier syntax: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_assignment(raw: &str) -> Option<Assignment> {
  let rest = raw.trim_start();
  let indent = &raw[..raw.len() - rest.len()];

  let (exported, export_gap, body) = match strip_export(rest) {
    Some((gap, body)) => (true, gap, body),
    None => (false, "", rest),
  };

  let (name, rhs) = body.split_once('=')?;
  if !is_identifier(name) {
    return None;
  }

  let (value, quote) = decode_value(rhs);
  Some(Assignment {
    name: name.to_string(),
    value,
    exported,
    format: Format {
      indent: indent.to_string(),
      export_gap: export_gap.to_string(),
      raw_value: rhs.to_string(),
      quote,
    },
  })
}

/// Split `export <ws>` off the front, returning the whitespace run and the rest.
///
/// `export=1` and `exporter=1` are plain assignments, so at least one
/// whitespace character must follow the keyword.
fn strip_export(s: &str) -> Option<(&str, &str)> {
  let after = s.strip_prefix("export")?;
  let body = after.trim_start();
  if body.len() == after.len() {
    return None;
  }
  Some((&after[..after.len() - body.len()], body))
}

fn decode_value(rhs: &str) -> (String, QuoteStyle) {
  if let Some(inner) = strip_wrapping(rhs, '"') {
    (unescape_double(inner), QuoteStyle::Double)
  } else if let Some(inner) = strip_wrapping(rhs, '\'') {
    (inner.to_string(), QuoteStyle::Single)
  } else {
    (rhs.to_string(), QuoteStyle::Bare)
  }
}

fn strip_wrapping(s: &str, quote: char) -> Option<&str> {
  if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
    Some(&s[1..s.len() - 1])
  } else {
    None
  }
}

/// Resolve the backslash escapes that are meaningful inside double quotes.
fn unescape_double(inner: &str) -> String {
  let mut out = String::with_capacity(inner.len());
  let mut chars = inner.chars().peekable();
  while let Some(c) = chars.next() {
    if c == '\\' {
      if let Some(&next) = chars.peek() {
        if matches!(next, '"' | '\\' | '$' | '`') {
          out.push(next);
          chars.next();
          continue;
        }
      }
    }
    out.push(c);
  }
  out
}
