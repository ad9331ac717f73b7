//! Source normalization into logical lines.
//!
//! After this pass every line is exactly one of:
//! - a statement (trailing `;` removed),
//! - a construct header ending in `{`,
//! - a lone `}`,
//! - a lone `{` that follows no construct header.
//!
//! Comments are removed; a `{` written on its own line is joined to the
//! construct header before it. Semicolons and newlines inside parentheses
//! do not split, so `for (let i = 0; i < 3; i++)` stays on one line.

use crate::header::{self, Header};

/// One logical line with the source line it started on (1-based).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Line {
    pub text: String,
    pub number: usize,
}

impl Line {
    pub fn opens_block(&self) -> bool {
        self.text.ends_with('{')
    }

    pub fn is_close(&self) -> bool {
        self.text == "}"
    }

    /// Whether this line, with a `{` appended, would open a known construct.
    fn is_header(&self) -> bool {
        header::classify(&self.text) != Header::Unknown
    }
}

pub(crate) fn logical_lines(source: &str) -> Vec<Line> {
    let mut builder = LineBuilder::default();
    let mut chars = source.chars().peekable();
    let mut in_block_comment = false;
    let mut parens = 0usize;

    while let Some(c) = chars.next() {
        if in_block_comment {
            match c {
                '*' if chars.peek() == Some(&'/') => {
                    chars.next();
                    in_block_comment = false;
                }
                '\n' => builder.source_line += 1,
                _ => {}
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block_comment = true;
            }
            '\n' => {
                if parens == 0 {
                    builder.flush();
                } else {
                    builder.push(' ');
                }
                builder.source_line += 1;
            }
            '(' => {
                parens += 1;
                builder.push(c);
            }
            ')' => {
                parens = parens.saturating_sub(1);
                builder.push(c);
            }
            ';' if parens == 0 => builder.flush(),
            '{' if parens == 0 => {
                builder.push(c);
                builder.flush();
            }
            '}' if parens == 0 => {
                builder.flush();
                builder.push(c);
                builder.flush();
            }
            _ => builder.push(c),
        }
    }
    builder.flush();
    builder.lines
}

#[derive(Debug)]
struct LineBuilder {
    lines: Vec<Line>,
    buffer: String,
    /// Source line of the first non-blank character in `buffer`.
    start: Option<usize>,
    source_line: usize,
}

impl Default for LineBuilder {
    fn default() -> Self {
        LineBuilder {
            lines: Vec::new(),
            buffer: String::new(),
            start: None,
            source_line: 1,
        }
    }
}

impl LineBuilder {
    fn push(&mut self, c: char) {
        if self.start.is_none() && !c.is_whitespace() {
            self.start = Some(self.source_line);
        }
        self.buffer.push(c);
    }

    fn flush(&mut self) {
        let text = self.buffer.trim();
        if let Some(number) = self.start.take() {
            let joins_header = text == "{"
                && self
                    .lines
                    .last()
                    .is_some_and(|last| !last.opens_block() && last.is_header());
            match self.lines.last_mut() {
                Some(last) if joins_header => last.text.push_str(" {"),
                _ => self.lines.push(Line {
                    text: text.to_owned(),
                    number,
                }),
            }
        }
        self.buffer.clear();
    }
}
