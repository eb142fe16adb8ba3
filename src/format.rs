//! Re-indentation and line wrapping for emitted source.
//!
//! A single character pass with no lexical analysis: only `{`, `}`, `(`, `)`
//! and `;` are structural. Everything else, comment text included, is copied
//! as-is, so fixed-format header blocks survive untouched.
//!
//! - Depth grows on `{` and shrinks on `}`; a `}` that opens a line dedents
//!   before the line is indented.
//! - Once the column reaches `max_width`, a `{`, `;` or `(` forces a break
//!   after itself, unless it already ends its line.
//! - A forced break after `(` switches to wrapped mode (double indent) until
//!   the matching `)`, which restores the previous depth.
//! - Width is only checked at the structural char itself. A line whose `(`
//!   sits before `max_width` is never wrapped, however long its parameter
//!   list runs; the layout does not look ahead.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutFormatter {
    /// One level of indentation.
    pub indent: String,
    pub max_width: usize,
}

impl Default for LayoutFormatter {
    fn default() -> Self {
        Self { indent: "    ".into(), max_width: 100 }
    }
}

/// Open paren that forced a wrap: its nesting level and the depth to restore.
struct Wrap {
    paren_level: usize,
    saved_depth: usize,
}

struct Layout<'a> {
    cfg: &'a LayoutFormatter,
    out: String,
    depth: usize,
    col: usize,
    paren_level: usize,
    wrap: Option<Wrap>,
    /// Indentation for the current line has not been written yet.
    pending_indent: bool,
    /// Just broke a line; swallow whitespace until real text.
    after_break: bool,
}

impl LayoutFormatter {
    pub fn new(indent: impl Into<String>, max_width: usize) -> Self {
        Self { indent: indent.into(), max_width }
    }

    /// `width` spaces per level.
    pub fn with_indent_width(width: usize, max_width: usize) -> Self {
        Self::new(" ".repeat(width), max_width)
    }

    pub fn format(&self, contents: &str) -> String {
        let mut lines: Vec<&str> = contents.split('\n').collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        let mut layout = Layout {
            cfg: self,
            out: String::with_capacity(contents.len() + contents.len() / 4),
            depth: 0,
            col: 0,
            paren_level: 0,
            wrap: None,
            pending_indent: false,
            after_break: false,
        };
        for line in lines {
            layout.line(line.strip_suffix('\r').unwrap_or(line));
        }
        layout.out
    }
}

impl Layout<'_> {
    fn line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.out.push('\n');
            return;
        }
        self.pending_indent = true;
        self.after_break = false;
        self.col = 0;

        let chars: Vec<char> = line.chars().collect();
        // index of the last non-blank char: a structural char there never forces a break
        let last = chars.iter().rposition(|c| !c.is_whitespace()).unwrap_or(0);

        for (i, &ch) in chars.iter().enumerate() {
            let ends_line = i == last;
            match ch {
                '{' => {
                    self.put(ch);
                    self.depth += 1;
                    self.break_if_wide(ends_line);
                }
                '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.put(ch);
                }
                '(' => {
                    self.put(ch);
                    self.paren_level += 1;
                    if self.wrap.is_none() && self.col >= self.cfg.max_width && !ends_line {
                        self.wrap = Some(Wrap { paren_level: self.paren_level, saved_depth: self.depth });
                        self.depth += 2;
                        self.line_break();
                    }
                }
                ')' => {
                    self.put(ch);
                    let level = self.paren_level;
                    if let Some(w) = self.wrap.take_if(|w| w.paren_level == level) {
                        self.depth = w.saved_depth;
                    }
                    self.paren_level = self.paren_level.saturating_sub(1);
                }
                ';' => {
                    self.put(ch);
                    self.break_if_wide(ends_line);
                }
                c if c.is_whitespace() && self.after_break => {}
                c => self.put(c),
            }
        }
        self.out.push('\n');
    }

    fn put(&mut self, ch: char) {
        if self.pending_indent {
            for _ in 0..self.depth {
                self.out.push_str(&self.cfg.indent);
            }
            self.col = self.depth * self.cfg.indent.chars().count();
            self.pending_indent = false;
        }
        self.after_break = false;
        self.out.push(ch);
        self.col += 1;
    }

    fn break_if_wide(&mut self, ends_line: bool) {
        if self.col >= self.cfg.max_width && !ends_line {
            self.line_break();
        }
    }

    fn line_break(&mut self) {
        self.out.push('\n');
        self.col = 0;
        self.pending_indent = true;
        self.after_break = true;
    }
}
