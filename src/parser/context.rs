//! Shared state of one parse: the options and the diagnostics collected so
//! far. Every recoverable condition goes through here so that the choice
//! between warning and failing is made in one place.

use crate::config::{NumberMode, ParseOptions};
use crate::diagnostics::{codes, Diagnostic, Diagnostics};
use crate::error::{MapError, Result};
use crate::types::Position;

use super::fields::parse_int;
use super::tokenizer::{Chunk, ChunkReader, Terminator};

#[derive(Debug)]
pub(crate) struct Context<'o> {
    pub options: &'o ParseOptions,
    pub diagnostics: Diagnostics,
}

impl<'o> Context<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn mode(&self) -> NumberMode {
        self.options.number_mode()
    }

    /// A chunk reader over `input`, which starts `offset` bytes into the
    /// source.
    pub fn reader<'a>(&self, input: &'a str, offset: usize) -> ChunkReader<'a> {
        ChunkReader::with_offset(input, offset).strict(self.options.strict_chunks)
    }

    /// Next chunk of `reader`, recovering from malformed text unless chunk
    /// checking is strict.
    pub fn next_chunk<'a>(
        &mut self,
        reader: &mut ChunkReader<'a>,
        terminator: &Terminator<'_>,
    ) -> Result<Option<Chunk<'a>>> {
        loop {
            match reader.next_chunk(terminator) {
                Ok(Some(chunk)) => {
                    if !chunk.terminated {
                        self.diagnostics.warning(
                            codes::UNTERMINATED_CHUNK,
                            format!(
                                "chunk '{}' is missing its {} terminator",
                                chunk.name,
                                terminator.resolve(chunk.name)
                            ),
                            chunk.offset,
                        );
                    }
                    return Ok(Some(chunk));
                }
                Ok(None) => return Ok(None),
                Err(MapError::MalformedChunk { offset, .. }) if !self.options.strict_chunks => {
                    self.diagnostics.warning(
                        codes::MALFORMED_CHUNK,
                        "skipped text outside of any chunk",
                        offset,
                    );
                    reader.skip_to_next_chunk();
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Read a number field.
    pub fn int(&self, field: &'static str, token: Option<&str>) -> Result<Option<i32>> {
        parse_int(field, token, self.mode())
    }

    /// Read a number field that may be left out entirely.
    pub fn optional_int(&self, field: &'static str, token: Option<&str>) -> Result<Option<i32>> {
        match token {
            Some(token) => self.int(field, Some(token)),
            None => Ok(None),
        }
    }

    /// Read an `x,y` pair. A half that is not a number is `None`.
    pub fn position(&self, x: Option<&str>, y: Option<&str>) -> Result<Position> {
        Ok(Position {
            x: self.int("x", x)?,
            y: self.int("y", y)?,
        })
    }

    /// Record that a record was dropped.
    pub fn drop_record(&mut self, kind: &str, reason: &str, offset: usize) {
        self.diagnostics.warning(
            codes::INVALID_RECORD,
            format!("{} record dropped: {}", kind, reason),
            offset,
        );
    }

    /// Handle a tile write that fell outside the grid.
    pub fn out_of_range(&mut self, err: MapError, offset: usize) -> Result<()> {
        if self.options.strict_chunks {
            return Err(err);
        }
        self.diagnostics.push(
            Diagnostic::warning(
                codes::OUT_OF_RANGE,
                format!("tile dropped: {}", err),
                offset,
            )
            .with_help(format!(
                "Tile layers hold at most {} cells per side",
                self.options.max_width
            )),
        );
        Ok(())
    }
}
