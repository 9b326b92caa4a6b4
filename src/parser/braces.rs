//! Balanced brace scanning over free text.
//!
//! A depth counter walks the text from the first `{`; the span closes when the
//! counter returns to zero. Quotes are not tracked, so a brace inside a string
//! literal counts like any other.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BraceScanError {
    #[error("no object literal found")]
    NotFound,
    #[error("unbalanced braces: object opened at byte {start} is never closed")]
    Unbalanced { start: usize },
}

/// Byte range of a balanced `{...}` object, braces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceSpan {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
}

impl BraceSpan {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn rest<'a>(&self, text: &'a str) -> &'a str {
        &text[self.end..]
    }
}

/// Finds the first outermost balanced object in `text`.
///
/// A `}` seen before any `{` is ignored.
pub fn find_object(text: &str) -> Result<BraceSpan, BraceScanError> {
    let mut depth = 0usize;
    let mut start = None;

    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(start) = start
                {
                    return Ok(BraceSpan { start, end: i + 1 });
                }
            }
            _ => {}
        }
    }

    match start {
        Some(start) => Err(BraceScanError::Unbalanced { start }),
        None => Err(BraceScanError::NotFound),
    }
}
