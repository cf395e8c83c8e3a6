//! Chunk tokenizer.
//!
//! A map file is a sequence of chunks:
//!
//! ```text
//! #NAME value terminator
//! ```
//!
//! The name runs from `#` to the first whitespace; the value runs until the
//! terminator. Which terminator applies is decided by the caller (`#END` at
//! the top level, `#PHEND<n>`, `#ED` or `#SELEND<n>` inside event scripts),
//! so the same reader works on any slice of the file and nested blocks are
//! read by starting a new reader over the parent chunk's value.

use crate::error::{MapError, Result};

/// Terminator of a top-level chunk.
pub const CHUNK_END: &str = "#END";

/// How a chunk's terminator is chosen.
#[derive(Debug, Clone, Copy)]
pub enum Terminator<'t> {
    /// The same terminator for every chunk.
    Fixed(&'t str),
    /// Computed from the chunk's name.
    Named(fn(&str) -> String),
}

impl Terminator<'_> {
    pub fn resolve(&self, name: &str) -> String {
        match self {
            Terminator::Fixed(end) => (*end).to_string(),
            Terminator::Named(f) => f(name),
        }
    }
}

/// A chunk read from the input. Borrowed from the source and never kept
/// past parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub name: &'a str,
    /// Everything between the name and the terminator.
    pub value: &'a str,
    /// Absolute byte offset of the `#` introducer.
    pub offset: usize,
    /// Absolute byte offset of the value.
    pub value_offset: usize,
    /// False when the input ended before the terminator.
    pub terminated: bool,
}

/// The value part of a chunk, as returned by [`ChunkReader::parse_chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkValue<'a> {
    pub text: &'a str,
    pub offset: usize,
    pub terminated: bool,
}

/// Cursor over a text buffer that reads chunks one at a time.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    input: &'a str,
    position: usize,
    base_offset: usize,
    strict: bool,
}

impl<'a> ChunkReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_offset(input, 0)
    }

    /// Reader over a slice that starts `base_offset` bytes into the file.
    pub fn with_offset(input: &'a str, base_offset: usize) -> Self {
        Self {
            input,
            position: 0,
            base_offset,
            strict: false,
        }
    }

    /// In strict mode a missing terminator is an error instead of ending
    /// the chunk at end of input.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Absolute offset of the cursor.
    pub fn offset(&self) -> usize {
        self.base_offset + self.position
    }

    pub fn is_ended(&self) -> bool {
        self.position >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        let input = self.input;
        &input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let skipped = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        self.position += skipped;
    }

    /// Skip whitespace, expect `#` and read the chunk name after it.
    pub fn parse_name(&mut self) -> Result<&'a str> {
        self.skip_whitespace();

        match self.rest().chars().next() {
            Some('#') => self.position += 1,
            found => {
                return Err(MapError::MalformedChunk {
                    offset: self.offset(),
                    found,
                })
            }
        }

        let rest = self.rest();
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.position += len;
        Ok(&rest[..len])
    }

    /// Read raw text up to `end` (consumed), then skip whitespace.
    ///
    /// Without a terminator the rest of the input becomes the value and
    /// `terminated` is false.
    pub fn parse_chunk(&mut self, end: &str) -> ChunkValue<'a> {
        let offset = self.offset();
        let rest = self.rest();

        let (text, terminated) = match rest.find(end) {
            Some(i) => {
                self.position += i + end.len();
                (&rest[..i], true)
            }
            None => {
                self.position = self.input.len();
                (rest, false)
            }
        };

        self.skip_whitespace();

        ChunkValue {
            text,
            offset,
            terminated,
        }
    }

    /// Read the next chunk, or `None` at end of input.
    pub fn next_chunk(&mut self, terminator: &Terminator<'_>) -> Result<Option<Chunk<'a>>> {
        self.skip_whitespace();
        if self.is_ended() {
            return Ok(None);
        }

        let offset = self.offset();
        let name = self.parse_name()?;
        let end = terminator.resolve(name);
        let value = self.parse_chunk(&end);

        if !value.terminated && self.strict {
            return Err(MapError::UnterminatedChunk {
                name: name.to_string(),
                terminator: end,
                offset,
            });
        }

        Ok(Some(Chunk {
            name,
            value: value.text,
            offset,
            value_offset: value.offset,
            terminated: value.terminated,
        }))
    }

    /// Move past unreadable text to the next `#`, for recovery after a
    /// [`MapError::MalformedChunk`].
    pub fn skip_to_next_chunk(&mut self) {
        let rest = self.rest();
        let skip = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '#')
            .map_or(rest.len(), |(i, _)| i);
        self.position += skip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const END: Terminator<'static> = Terminator::Fixed(CHUNK_END);

    #[test]
    fn test_parse_name_and_chunk() {
        let mut reader = ChunkReader::new("  #HERO\n3,4#END\n\n#BGM x#END");

        assert_eq!(reader.parse_name().unwrap(), "HERO");
        let value = reader.parse_chunk("#END");
        assert_eq!(value.text, "\n3,4");
        assert!(value.terminated);
        assert_eq!(value.offset, 7);

        assert_eq!(reader.parse_name().unwrap(), "BGM");
        assert_eq!(reader.parse_chunk("#END").text, " x");
        assert!(reader.is_ended());
    }

    #[test]
    fn test_parse_name_requires_hash() {
        let mut reader = ChunkReader::new("   HERO 1,2#END");
        let err = reader.parse_name().unwrap_err();
        assert!(matches!(
            err,
            MapError::MalformedChunk {
                offset: 3,
                found: Some('H')
            }
        ));
    }

    #[test]
    fn test_parse_name_at_end() {
        let mut reader = ChunkReader::new("  ");
        assert!(matches!(
            reader.parse_name(),
            Err(MapError::MalformedChunk { found: None, .. })
        ));
    }

    #[test]
    fn test_next_chunk_sequence() {
        let mut reader = ChunkReader::new("#HERO\n3,4#END\n#BGIMG http://x/y.png#END\n");

        let hero = reader.next_chunk(&END).unwrap().unwrap();
        assert_eq!(hero.name, "HERO");
        assert_eq!(hero.value, "\n3,4");
        assert_eq!(hero.offset, 0);

        let bg = reader.next_chunk(&END).unwrap().unwrap();
        assert_eq!(bg.name, "BGIMG");
        assert_eq!(bg.value.trim(), "http://x/y.png");
        assert_eq!(bg.offset, 14);

        assert_eq!(reader.next_chunk(&END).unwrap(), None);
    }

    #[test]
    fn test_unterminated_is_lenient_by_default() {
        let mut reader = ChunkReader::new("#BGM music.mp3");
        let chunk = reader.next_chunk(&END).unwrap().unwrap();
        assert_eq!(chunk.value, " music.mp3");
        assert!(!chunk.terminated);
        assert!(reader.is_ended());
    }

    #[test]
    fn test_unterminated_strict() {
        let mut reader = ChunkReader::new("#BGM music.mp3").strict(true);
        let err = reader.next_chunk(&END).unwrap_err();
        assert!(matches!(
            err,
            MapError::UnterminatedChunk { ref name, ref terminator, offset: 0 }
                if name == "BGM" && terminator == "#END"
        ));
    }

    #[test]
    fn test_named_terminator() {
        fn phase_end(name: &str) -> String {
            format!("#PHEND{}", &name[2..])
        }

        let mut reader = ChunkReader::new("#PH1 a#PHEND0 b#PHEND1\n#PH0 c#PHEND0");
        let end = Terminator::Named(phase_end);

        let first = reader.next_chunk(&end).unwrap().unwrap();
        assert_eq!(first.name, "PH1");
        assert_eq!(first.value, " a#PHEND0 b");

        let second = reader.next_chunk(&end).unwrap().unwrap();
        assert_eq!(second.name, "PH0");
        assert_eq!(second.value, " c");
    }

    #[test]
    fn test_nested_reader_offsets() {
        let source = "#EPOINT tx:1,ty:2,\n#PH0 tm:0,\n#PHEND0\n#END";
        let mut outer = ChunkReader::new(source);
        let chunk = outer.next_chunk(&END).unwrap().unwrap();

        let body_start = chunk.value.find('\n').unwrap() + 1;
        let mut inner = ChunkReader::with_offset(&chunk.value[body_start..], chunk.value_offset + body_start);
        let phase = inner.next_chunk(&Terminator::Fixed("#PHEND0")).unwrap().unwrap();

        assert_eq!(phase.name, "PH0");
        assert_eq!(&source[phase.offset..phase.offset + 4], "#PH0");
        assert_eq!(&source[phase.value_offset..phase.value_offset + 5], " tm:0");
    }

    #[test]
    fn test_skip_to_next_chunk() {
        let mut reader = ChunkReader::new("garbage here #HERO\n1,1#END");
        assert!(reader.next_chunk(&END).is_err());

        reader.skip_to_next_chunk();
        let chunk = reader.next_chunk(&END).unwrap().unwrap();
        assert_eq!(chunk.name, "HERO");
    }

    #[test]
    fn test_skip_to_next_chunk_without_hash() {
        let mut reader = ChunkReader::new("nothing to see");
        reader.skip_to_next_chunk();
        assert!(reader.is_ended());
    }

    #[test]
    fn test_empty_value() {
        let mut reader = ChunkReader::new("#BGM#END");
        // The name swallows everything up to whitespace.
        let chunk = reader.next_chunk(&END).unwrap().unwrap();
        assert_eq!(chunk.name, "BGM#END");
        assert!(!chunk.terminated);
    }
}
