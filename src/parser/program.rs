use super::ast::{BlockKind, Instruction, Program, TableEntry};
use super::blocks::{BlockBody, BlockHeader, BlockSegmenter};
use super::constants::ConstantsBuilder;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::lexer::{Grammar, LineSource};

/// Single-pass parser from a2 source text to a [`Program`]
///
/// Fails on the first error; no partial program is returned.
#[derive(Debug, Clone)]
pub struct ProgramParser {
    options: ParseOptions,
    grammar: Grammar,
}

impl Default for ProgramParser {
    fn default() -> Self {
        ProgramParser {
            options: ParseOptions::default(),
            grammar: Grammar::default(),
        }
    }
}

impl ProgramParser {
    pub fn new(options: ParseOptions) -> Result<Self> {
        options.validate()?;
        Ok(ProgramParser {
            grammar: Grammar::new(options.indent_unit)?,
            options,
        })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a complete source text
    pub fn parse(&self, source: &str) -> Result<Program> {
        let mut program = Program::default();
        let mut segmenter = BlockSegmenter::new(LineSource::new(source));

        while let Some((header, body)) = segmenter.next_block()? {
            match header.kind {
                BlockKind::Constants => self.constants_block(&header, body, &mut program)?,
                BlockKind::Table => self.table_block(&header, body, &mut program)?,
                BlockKind::Code => self.code_block(&header, body, &mut program)?,
            }
        }

        tracing::debug!(
            roots = program.constants.len(),
            table = program.table.len(),
            instructions = program.instructions.len(),
            "parsed program"
        );
        Ok(program)
    }

    fn constants_block(
        &self,
        header: &BlockHeader,
        body: BlockBody<'_, '_>,
        program: &mut Program,
    ) -> Result<()> {
        let mut builder = ConstantsBuilder::new(
            &mut program.constants,
            &header.name,
            self.grammar,
            self.options.indent_jumps,
        );
        for line in body {
            builder.feed(&line)?;
        }

        let (nodes, bit_fields) = builder.finish();
        tracing::debug!(block = %header.name, nodes, bit_fields, "constants block done");
        Ok(())
    }

    fn table_block(
        &self,
        header: &BlockHeader,
        body: BlockBody<'_, '_>,
        program: &mut Program,
    ) -> Result<()> {
        let before = program.table.len();
        for line in body {
            let entry = self
                .grammar
                .named_reference(&line.text)
                .map_err(|e| e.at_line(line.number))?;
            program.table.push(TableEntry {
                name: entry.name,
                value: entry.series,
                line: line.number,
            });
        }

        tracing::debug!(
            block = %header.name,
            entries = program.table.len() - before,
            "table block done"
        );
        Ok(())
    }

    fn code_block(
        &self,
        header: &BlockHeader,
        body: BlockBody<'_, '_>,
        program: &mut Program,
    ) -> Result<()> {
        let before = program.instructions.len();
        // (tag, line) waiting for the next instruction
        let mut pending: Option<(String, usize)> = None;

        for line in body {
            let tag = self
                .grammar
                .tag_label(&line.text)
                .map_err(|e| e.at_line(line.number))?;
            if let Some(tag) = tag {
                if let Some((previous, at)) = pending.replace((tag.name, line.number)) {
                    tracing::warn!(
                        tag = %previous,
                        line = at,
                        "tag replaced by a later tag before any instruction"
                    );
                }
                continue;
            }

            let inst = self
                .grammar
                .instruction(&line.text)
                .map_err(|e| e.at_line(line.number))?;
            program.instructions.push(Instruction {
                tag: pending.take().map(|(name, _)| name),
                func: inst.func,
                args: inst.args,
                indent: inst.indent,
                line: line.number,
            });
        }

        if let Some((tag, line)) = pending {
            tracing::warn!(tag = %tag, line, "tag at end of code block labels nothing");
        }

        tracing::debug!(
            block = %header.name,
            instructions = program.instructions.len() - before,
            "code block done"
        );
        Ok(())
    }
}
