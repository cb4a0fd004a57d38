use super::ast::BlockKind;
use crate::error::{Error, Result};
use crate::lexer::{Line, LineSource};

/// Header line of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub kind: BlockKind,
    /// Header text without sigil and trailing `:`
    pub name: String,
    pub line: usize,
}

impl BlockHeader {
    /// Classify a zero-indent line
    pub fn from_line(line: &Line) -> Self {
        let text = line.text.as_str();
        let kind = text
            .chars()
            .next()
            .map(BlockKind::from_sigil)
            .unwrap_or(BlockKind::Code);

        let name = match kind.sigil() {
            Some(sigil) => &text[sigil.len_utf8()..],
            None => text,
        };
        let name = name.strip_suffix(':').unwrap_or(name).trim_end();

        BlockHeader {
            kind,
            name: name.to_string(),
            line: line.number,
        }
    }
}

/// Splits a line source into blocks
pub struct BlockSegmenter<'a> {
    source: LineSource<'a>,
}

impl<'a> BlockSegmenter<'a> {
    pub fn new(source: LineSource<'a>) -> Self {
        BlockSegmenter { source }
    }

    /// Fetch the next header and a cursor over its body.
    ///
    /// The cursor borrows the segmenter, so a block has to be finished with
    /// before the next one is requested. Lines the cursor did not consume are
    /// seen here and rejected as misplaced.
    pub fn next_block(&mut self) -> Result<Option<(BlockHeader, BlockBody<'_, 'a>)>> {
        let line = match self.source.next_line() {
            Some(line) => line,
            None => return Ok(None),
        };

        if !line.is_header() {
            return Err(Error::ExpectedBlockHeader {
                line: line.number,
                text: line.text,
            });
        }

        let header = BlockHeader::from_line(&line);
        tracing::debug!(
            kind = ?header.kind,
            name = %header.name,
            line = header.line,
            "block header"
        );

        Ok(Some((
            header,
            BlockBody {
                source: &mut self.source,
                finished: false,
            },
        )))
    }
}

/// Body lines of one block
///
/// Ends at the next header line, which goes back to the line source for the
/// segmenter to pick up.
#[derive(Debug)]
pub struct BlockBody<'s, 'a> {
    source: &'s mut LineSource<'a>,
    finished: bool,
}

impl Iterator for BlockBody<'_, '_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.finished {
            return None;
        }

        match self.source.next_line() {
            Some(line) if line.is_header() => {
                self.source.rewind();
                self.finished = true;
                None
            }
            Some(line) => Some(line),
            None => {
                self.finished = true;
                None
            }
        }
    }
}
