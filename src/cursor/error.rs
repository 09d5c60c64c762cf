use crate::{ChunkError, HeaderError, ParseError};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes through a [`ByteCursor`](super::ByteCursor)
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a cursor read can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    Parse(#[from] ParseError),
    /// Fewer bytes remain than the read asked for.
    #[error("Truncated input: needed {requested} byte(s), {remaining} left")]
    TruncatedInput {
        /// Bytes the read asked for
        requested: usize,
        /// Bytes that were left in the buffer
        remaining: usize,
    },
}

impl ReaderErrorKind {
    pub(crate) const fn chunk(chunk_err: ChunkError) -> Self {
        Self::Parse(ParseError::Chunk(chunk_err))
    }

    pub(crate) const fn header(header_err: HeaderError) -> Self {
        Self::Parse(ParseError::Header(header_err))
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the input ended before a read could complete
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedInput { .. })
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Parse(error),
        }
    }

    /// Create a new truncated input error
    pub const fn truncated(position: usize, requested: usize, remaining: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::TruncatedInput {
                requested,
                remaining,
            },
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
