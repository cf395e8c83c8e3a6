use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mapchunk operations
#[derive(Error, Diagnostic, Debug)]
pub enum MapError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(mapchunk::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(mapchunk::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(mapchunk::command))]
    Command {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Expected \"#\" at byte {offset}, found {}", describe(.found))]
    #[diagnostic(
        code(mapchunk::malformed_chunk),
        help("Every chunk starts with #NAME")
    )]
    MalformedChunk { offset: usize, found: Option<char> },

    #[error("Chunk '{name}' at byte {offset} is missing its {terminator} terminator")]
    #[diagnostic(code(mapchunk::unterminated_chunk))]
    UnterminatedChunk {
        name: String,
        terminator: String,
        offset: usize,
    },

    #[error("Required chunk '{field}' not found")]
    #[diagnostic(
        code(mapchunk::missing_field),
        help("Add a #HERO x,y#END chunk")
    )]
    MissingRequiredField { field: &'static str, offset: usize },

    #[error("Tile coordinate ({x}, {y}) is outside the {max}x{max} grid")]
    #[diagnostic(code(mapchunk::out_of_range))]
    OutOfRange { x: i64, y: i64, max: u32 },

    #[error("Invalid number for {field}: '{value}'")]
    #[diagnostic(code(mapchunk::invalid_number))]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid sprite token '{token}'")]
    #[diagnostic(
        code(mapchunk::invalid_sprite),
        help("Sprite tokens look like 3, A12, -7, 0_8 or 12C")
    )]
    InvalidSprite { token: String },

    #[error("Invalid event phase '{name}'")]
    #[diagnostic(
        code(mapchunk::invalid_phase),
        help("Event points hold the phases PH0 to PH3")
    )]
    InvalidPhase { name: String },

    #[error("In chunk '{name}' at byte {offset}")]
    #[diagnostic(code(mapchunk::chunk))]
    InChunk {
        name: String,
        offset: usize,
        #[source]
        source: Box<MapError>,
    },
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

impl MapError {
    /// Wrap this error with the chunk it occurred in.
    pub fn in_chunk(self, name: impl Into<String>, offset: usize) -> Self {
        MapError::InChunk {
            name: name.into(),
            offset,
            source: Box::new(self),
        }
    }

    /// Byte offset into the parsed source, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            MapError::MalformedChunk { offset, .. }
            | MapError::UnterminatedChunk { offset, .. }
            | MapError::MissingRequiredField { offset, .. }
            | MapError::InChunk { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Name of the innermost chunk the error is attributed to.
    pub fn chunk_name(&self) -> Option<&str> {
        match self {
            MapError::InChunk { name, source, .. } => {
                source.chunk_name().or(Some(name.as_str()))
            }
            MapError::UnterminatedChunk { name, .. } => Some(name),
            MapError::MissingRequiredField { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_chunk_reports_innermost_name() {
        let err = MapError::UnterminatedChunk {
            name: "MSG".to_string(),
            terminator: "#ED".to_string(),
            offset: 40,
        }
        .in_chunk("EPOINT", 12);

        assert_eq!(err.offset(), Some(12));
        assert_eq!(err.chunk_name(), Some("MSG"));
        assert_eq!(err.to_string(), "In chunk 'EPOINT' at byte 12");
    }

    #[test]
    fn test_malformed_message() {
        let err = MapError::MalformedChunk {
            offset: 3,
            found: Some('x'),
        };
        assert_eq!(err.to_string(), "Expected \"#\" at byte 3, found 'x'");

        let err = MapError::MalformedChunk {
            offset: 9,
            found: None,
        };
        assert!(err.to_string().ends_with("end of input"));
    }
}
