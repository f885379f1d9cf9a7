use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot correct outlier at position {position} of {len}: missing neighbour")]
    BoundaryCorrection { position: usize, len: usize },

    #[error("position {position} is outside a series of length {len}")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("unsupported fill method: {0}")]
    UnsupportedFill(String),

    #[error("index is not strictly increasing at position {0}")]
    UnorderedIndex(usize),

    #[error("length mismatch: index has {index} entries, values has {values}")]
    LengthMismatch { index: usize, values: usize },

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SeriesError>;

impl From<serde_json::Error> for SeriesError {
    fn from(e: serde_json::Error) -> Self {
        SeriesError::Parse(e.to_string())
    }
}
