//! Lexical view of a display lambda.
//!
//! The lambda is C++. Structure is matched on a masked copy in which comments
//! and string/char literals are blanked to spaces, so braces or labels inside
//! them never count. Newlines survive masking and offsets stay aligned with
//! the source text. Raw strings (`R"(...)"`) and digit separators (`1'000`)
//! are understood.

use std::ops::Range;

/// A `//` comment: offset of the slashes and the text after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineComment<'a> {
    /// Byte offset of the leading `//`
    pub offset: usize,
    /// Comment text after `//`, up to the end of the line
    pub body: &'a str,
}

/// Lambda text with its masked copy, line comments and line index.
#[derive(Debug, Clone)]
pub struct LambdaSource<'a> {
    masked: Vec<u8>,
    comments: Vec<LineComment<'a>>,
    line_starts: Vec<usize>,
    first_line: usize,
}

impl<'a> LambdaSource<'a> {
    /// Scans the lambda text.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        let mut masked = bytes.to_vec();
        let mut comments = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    let end = line_end(bytes, i);
                    comments.push(LineComment {
                        offset: i,
                        body: &text[i + 2..end],
                    });
                    blank(&mut masked, i..end);
                    i = end;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    let end = text[i + 2..]
                        .find("*/")
                        .map_or(bytes.len(), |pos| i + 2 + pos + 2);
                    blank(&mut masked, i..end);
                    i = end;
                }
                b'"' if is_raw_string_prefix(bytes, i) => {
                    let end = raw_string_end(text, i);
                    blank(&mut masked, i..end);
                    i = end;
                }
                b'\'' if is_digit_separator(bytes, i) => i += 1,
                quote @ (b'"' | b'\'') => {
                    let mut j = i + 1;
                    while j < bytes.len() && bytes[j] != quote && bytes[j] != b'\n' {
                        j += if bytes[j] == b'\\' { 2 } else { 1 };
                    }
                    let end = if bytes.get(j) == Some(&quote) {
                        j + 1
                    } else {
                        j.min(bytes.len())
                    };
                    blank(&mut masked, i..end);
                    i = end;
                }
                _ => i += 1,
            }
        }

        let line_starts = std::iter::once(0)
            .chain(
                bytes
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| **b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();

        Self {
            masked,
            comments,
            line_starts,
            first_line: 1,
        }
    }

    /// Numbers lines from `first_line` instead of 1.
    #[must_use]
    pub const fn starting_at(mut self, first_line: usize) -> Self {
        self.first_line = first_line;
        self
    }

    /// Text with comments and literals blanked out.
    #[must_use]
    pub fn masked(&self) -> &[u8] {
        &self.masked
    }

    /// Line containing the byte offset, counted from the first line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.first_line + self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    /// Line comments whose `//` lies in the range, in source order.
    pub fn comments_in(&self, range: Range<usize>) -> impl Iterator<Item = &LineComment<'a>> {
        self.comments
            .iter()
            .filter(move |comment| range.contains(&comment.offset))
    }

    /// Line comments outside the range, in source order.
    pub fn comments_outside(&self, range: Range<usize>) -> impl Iterator<Item = &LineComment<'a>> {
        self.comments
            .iter()
            .filter(move |comment| !range.contains(&comment.offset))
    }

    /// Offset of the `}` closing the `{` at `open`.
    #[must_use]
    pub fn matching_brace(&self, open: usize) -> Option<usize> {
        if self.masked.get(open) != Some(&b'{') {
            return None;
        }

        let mut depth = 0usize;
        for (offset, byte) in self.masked.iter().enumerate().skip(open) {
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(offset);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Net brace nesting change across the range.
    #[must_use]
    pub fn depth_change(&self, range: Range<usize>) -> i64 {
        self.masked[range].iter().fold(0, |depth, byte| match byte {
            b'{' => depth + 1,
            b'}' => depth - 1,
            _ => depth,
        })
    }
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |pos| from + pos)
}

const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Start of the identifier-like token ending just before `at`.
fn token_start(bytes: &[u8], at: usize) -> usize {
    bytes[..at]
        .iter()
        .rposition(|&b| !is_ident_byte(b))
        .map_or(0, |pos| pos + 1)
}

/// True if the quote at `at` opens a raw string literal.
fn is_raw_string_prefix(bytes: &[u8], at: usize) -> bool {
    matches!(
        &bytes[token_start(bytes, at)..at],
        b"R" | b"u8R" | b"uR" | b"UR" | b"LR"
    )
}

/// Offset just past the raw string whose quote is at `quote`.
fn raw_string_end(text: &str, quote: usize) -> usize {
    let rest = &text[quote + 1..];
    let Some(paren) = rest.find('(') else {
        return line_end(text.as_bytes(), quote);
    };
    let delimiter = &rest[..paren];
    if delimiter.len() > 16 || delimiter.contains(|c: char| c.is_whitespace() || c == ')' || c == '\\') {
        return line_end(text.as_bytes(), quote);
    }

    let terminator = format!("){delimiter}\"");
    let body = quote + 1 + paren + 1;
    text[body..]
        .find(&terminator)
        .map_or(text.len(), |pos| body + pos + terminator.len())
}

/// True if the `'` at `at` separates digits of a number literal.
fn is_digit_separator(bytes: &[u8], at: usize) -> bool {
    let start = token_start(bytes, at);
    start < at
        && bytes[start].is_ascii_digit()
        && bytes.get(at + 1).is_some_and(u8::is_ascii_hexdigit)
}

fn blank(masked: &mut [u8], range: Range<usize>) {
    for byte in &mut masked[range] {
        if *byte != b'\n' {
            *byte = b' ';
        }
    }
}
