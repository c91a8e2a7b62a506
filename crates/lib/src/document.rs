//! In-memory representation of a whole environment file.

use crate::line::{Assignment, Line};

/// An environment file as an ordered sequence of classified lines.
///
/// Lines are split on `\n` only. Whether the last line was terminated is
/// tracked separately so the file renders back byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
  lines: Vec<Line>,
  trailing_newline: bool,
}

impl EnvFile {
  /// Parse file content. Empty content is a file with zero lines.
  pub fn parse(text: &str) -> Self {
    if text.is_empty() {
      return Self::default();
    }

    let trailing_newline = text.ends_with('\n');
    let body = text.strip_suffix('\n').unwrap_or(text);
    let lines = body.split('\n').map(Line::classify).collect();

    Self {
      lines,
      trailing_newline,
    }
  }

  pub(crate) fn from_parts(lines: Vec<Line>, trailing_newline: bool) -> Self {
    Self {
      lines,
      trailing_newline,
    }
  }

  pub fn lines(&self) -> &[Line] {
    &self.lines
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn has_trailing_newline(&self) -> bool {
    self.trailing_newline
  }

  /// The first assignment of `name`, which is the authoritative one.
  pub fn first_assignment(&self, name: &str) -> Option<(usize, &Assignment)> {
    self
      .lines
      .iter()
      .enumerate()
      .find_map(|(i, line)| line.assignment().filter(|a| a.name == name).map(|a| (i, a)))
  }

  /// Indices of every line assigning `name`, in file order.
  pub fn assignment_indices(&self, name: &str) -> Vec<usize> {
    self
      .lines
      .iter()
      .enumerate()
      .filter(|(_, line)| line.assigns(name))
      .map(|(i, _)| i)
      .collect()
  }

  /// Serialize back to text.
  pub fn render(&self) -> String {
    if self.lines.is_empty() {
      return String::new();
    }

    let mut out = self.lines.iter().map(Line::raw).collect::<Vec<_>>().join("\n");
    if self.trailing_newline {
      out.push('\n');
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::line::LineKind;

  #[test]
  fn empty_text_has_no_lines() {
    let file = EnvFile::parse("");
    assert!(file.is_empty());
    assert_eq!(file.render(), "");
  }

  #[test]
  fn render_round_trips_exactly() {
    for text in [
      "\n",
      "FOO=bar",
      "FOO=bar\n",
      "# header\n\nexport FOO=\"a b\"\n  weird line ;;\n",
      "A=1\n\n\n",
      "A=1\r\nB=2\r\n",
    ] {
      assert_eq!(EnvFile::parse(text).render(), text, "{text:?}");
    }
  }

  #[test]
  fn single_newline_is_one_blank_line() {
    let file = EnvFile::parse("\n");
    assert_eq!(file.len(), 1);
    assert_eq!(file.lines()[0].kind(), &LineKind::Blank);
    assert!(file.has_trailing_newline());
  }

  #[test]
  fn first_assignment_wins() {
    let file = EnvFile::parse("# FOO=commented\nFOO=1\nexport FOO=2\n");
    let (index, a) = file.first_assignment("FOO").unwrap();
    assert_eq!(index, 1);
    assert_eq!(a.value, "1");
    assert_eq!(file.assignment_indices("FOO"), vec![1, 2]);
    assert!(file.first_assignment("BAR").is_none());
  }
}
