use serde::{Deserialize, Serialize};
use std::str::Lines;

/// A cleaned source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line number in the source text (1-indexed)
    pub number: usize,
    /// Text with trailing blanks removed; leading blanks are kept
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Line {
            number,
            text: text.into(),
        }
    }

    /// A header starts in the first column.
    pub fn is_header(&self) -> bool {
        !self.text.starts_with(' ')
    }

    /// Number of leading space characters
    pub fn leading_spaces(&self) -> usize {
        self.text.bytes().take_while(|b| *b == b' ').count()
    }
}

/// Pull-based source of cleaned lines with one line of push-back.
///
/// Blank lines and comment lines (first non-blank character `'`) are
/// skipped, trailing blanks are trimmed.
#[derive(Debug)]
pub struct LineSource<'a> {
    lines: Lines<'a>,
    /// Number of the last raw line read
    line_no: usize,
    /// Last line handed out
    last: Option<Line>,
    rewound: bool,
}

impl<'a> LineSource<'a> {
    pub fn new(text: &'a str) -> Self {
        LineSource {
            lines: text.lines(),
            line_no: 0,
            last: None,
            rewound: false,
        }
    }

    /// Returns the next cleaned line, or the pushed-back line if
    /// [`rewind`](Self::rewind) was called since the last read.
    pub fn next_line(&mut self) -> Option<Line> {
        if self.rewound {
            self.rewound = false;
            return self.last.clone();
        }

        for raw in self.lines.by_ref() {
            self.line_no += 1;

            let trimmed = raw.trim_end();
            let first = match trimmed.trim_start().chars().next() {
                Some(c) => c,
                None => continue,
            };
            if first == '\'' {
                continue;
            }

            let line = Line::new(self.line_no, trimmed);
            self.last = Some(line.clone());
            return Some(line);
        }

        None
    }

    /// Push the last line back; the next read returns it again.
    ///
    /// Depth is one: rewinding twice without a read in between still
    /// re-delivers the line once. Rewinding before any read is a no-op.
    pub fn rewind(&mut self) {
        if self.last.is_some() {
            self.rewound = true;
        }
    }
}

impl Iterator for LineSource<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        self.next_line()
    }
}
