//! Greedy word wrapping.

/// Horizontal padding subtracted from the available width, 20px on each side.
pub const HORIZONTAL_PADDING: f32 = 40.0;

/// A wrapped line of text, positioned at its baseline's left end.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
   pub text: String,
   pub x: f32,
   pub y: f32,
}

impl Line {
   fn new(buffer: &str, x: f32, y: f32) -> Self {
      // The buffer carries a space after every accepted word.
      let text = buffer.strip_suffix(' ').unwrap_or(buffer).to_owned();
      Self { text, x, y }
   }
}

/// Breaks `text` into lines no wider than `max_width - HORIZONTAL_PADDING`, as measured by
/// `measure`.
///
/// Words are separated by single spaces. Words are appended to the current line until the line
/// with the next word appended would be too wide; the current line is then emitted and the word
/// starts a new line `line_height` further down. The last line is always emitted.
///
/// Words are never split. A word wider than the limit ends up on a line of its own, and if it
/// is the very first word, it is preceded by an empty line.
pub fn wrap_text(
   text: &str,
   x: f32,
   y: f32,
   max_width: f32,
   line_height: f32,
   measure: impl Fn(&str) -> f32,
) -> Vec<Line> {
   let limit = max_width - HORIZONTAL_PADDING;
   let mut lines = Vec::new();
   let mut buffer = String::new();
   let mut y = y;
   for word in text.split(' ') {
      let candidate = format!("{}{}", buffer, word);
      if measure(&candidate) > limit {
         lines.push(Line::new(&buffer, x, y));
         buffer = format!("{} ", word);
         y += line_height;
      } else {
         buffer = candidate + " ";
      }
   }
   lines.push(Line::new(&buffer, x, y));
   lines
}
