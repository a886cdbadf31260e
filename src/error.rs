use std::fmt::{self, Debug, Display, Formatter};

use crate::State;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while parsing a multipart body and in the
/// operations layered on top of the parser.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The parser stopped before the end of a chunk.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Multipart stream is incomplete.
    #[error("incomplete multipart stream")]
    IncompleteStream,

    /// Stream read failed.
    #[error("stream read failed: {0}")]
    StreamReadFailed(#[source] BoxError),

    /// A part's data exceeded the maximum size limit.
    #[error("part exceeded the maximum size limit: {limit} bytes")]
    PartSizeExceeded { limit: u64 },

    /// The incoming stream size exceeded the maximum limit.
    #[error("stream size exceeded the maximum limit: {limit} bytes")]
    StreamSizeExceeded { limit: u64 },

    /// Failed to decode a part's header name to
    /// [`HeaderName`](http::header::HeaderName) type.
    #[error("failed to decode part's raw header name: {name:?} {cause}")]
    DecodeHeaderName {
        name: String,
        #[source]
        cause: BoxError,
    },

    /// Failed to decode a part's header value to
    /// [`HeaderValue`](http::header::HeaderValue) type.
    #[error("failed to decode part's raw header value: {cause}")]
    DecodeHeaderValue {
        value: Vec<u8>,
        #[source]
        cause: BoxError,
    },

    /// The `Content-Type` header is not `multipart/form-data`.
    #[error("Content-Type is not multipart/form-data")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[error("Failed to convert Content-Type to `mime::Mime` type: {0}")]
    DecodeContentType(#[source] mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[error("multipart boundary not found in Content-Type")]
    NoBoundary,

    /// Failed to decode the part data as `JSON` in
    /// [`part.json()`](crate::Part::json) method.
    #[cfg(feature = "json")]
    #[error("failed to decode part data as JSON: {0}")]
    DecodeJson(#[source] serde_json::Error),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}

/// Why and where [`execute`](crate::Parser::execute) stopped short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset} ({state:?})")]
pub struct ParseError {
    /// Offset of the offending byte within the chunk handed to `execute`.
    pub offset: usize,
    /// State the parser was in when it stopped.
    pub state: State,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The body does not open with `--boundary CR LF`.
    #[error("malformed opening boundary")]
    InvalidBoundary,
    /// A header name contained something other than a letter or `-`.
    #[error("invalid character 0x{0:02X} in header name")]
    InvalidHeaderField(u8),
    /// A `CR` in the header block was not followed by `LF`.
    #[error("expected LF after CR")]
    MissingLineFeed,
    /// A byte after a matched boundary was neither `--` nor `CR LF`.
    #[error("unexpected byte 0x{0:02X} after boundary")]
    UnexpectedByte(u8),
    /// A [`Handler`](crate::Handler) asked to stop.
    #[error("parsing aborted by handler")]
    Aborted,
}

impl ParseErrorKind {
    /// Returns `true` when the stop was requested by the handler rather than
    /// caused by malformed input.
    pub fn is_abort(self) -> bool {
        self == ParseErrorKind::Aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            offset: 7,
            state: State::HeaderField,
            kind: ParseErrorKind::InvalidHeaderField(b'@'),
        };
        assert_eq!(
            err.to_string(),
            "invalid character 0x40 in header name at offset 7 (HeaderField)"
        );

        let err = Error::from(ParseError {
            offset: 3,
            state: State::PartDataFinalHyphen,
            kind: ParseErrorKind::UnexpectedByte(b'x'),
        });
        assert_eq!(
            err.to_string(),
            "unexpected byte 0x78 after boundary at offset 3 (PartDataFinalHyphen)"
        );
    }

    #[test]
    fn test_error_eq_by_message() {
        assert_eq!(Error::IncompleteStream, Error::IncompleteStream);
        assert_eq!(
            Error::PartSizeExceeded { limit: 10 },
            Error::PartSizeExceeded { limit: 10 }
        );
        assert_ne!(Error::NoBoundary, Error::NoMultipart);
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let parse = ParseError {
            offset: 0,
            state: State::StartBoundary,
            kind: ParseErrorKind::InvalidBoundary,
        };
        let err = Error::from(parse);
        assert_eq!(err.source().map(|src| src.to_string()), Some(parse.to_string()));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "reset");
        let err = Error::StreamReadFailed(io.into());
        assert_eq!(err.source().map(|src| src.to_string()), Some("reset".to_owned()));

        assert!(Error::IncompleteStream.source().is_none());
    }
}
