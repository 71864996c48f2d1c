use thiserror::Error;

use crate::exif::MAX_PAYLOAD_LEN;

/// Cargo fields or coordinates rejected before any bytes are built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid metadata: field `{field}` {reason}")]
    InvalidMetadata {
        field: &'static str,
        reason: &'static str,
    },
    #[error("GPS coordinate out of range: lat {lat}, lon {lon}")]
    GpsOutOfRange { lat: f64, lon: f64 },
}

/// The assembled EXIF payload cannot be stored in a single JPEG segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("EXIF payload is {size} bytes, a JPEG segment holds at most {max}", max = MAX_PAYLOAD_LEN)]
    SegmentTooLarge { size: usize },
}

/// The source bytes are not a parseable JPEG marker stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedJpegError {
    #[error("missing start-of-image marker")]
    MissingSoi,
    #[error("expected a marker at offset {offset}, found 0x{byte:02X}")]
    ExpectedMarker { offset: usize, byte: u8 },
    #[error("segment 0xFF{marker:02X} at offset {offset} has invalid length {length}")]
    InvalidLength { marker: u8, offset: usize, length: u16 },
    #[error("segment 0xFF{marker:02X} at offset {offset} runs past the end of the buffer")]
    TruncatedSegment { marker: u8, offset: usize },
    #[error("buffer ended before start-of-scan or end-of-image")]
    UnexpectedEnd,
}

/// The pipeline stage an [`EmbedError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Encode,
    Splice,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Encode => "encode",
            Stage::Splice => "splice",
        };
        f.write_str(name)
    }
}

/// First error raised by [`embed`](crate::embed).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbedError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("EXIF encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("malformed JPEG: {0}")]
    MalformedJpeg(#[from] MalformedJpegError),
}

impl EmbedError {
    pub fn stage(&self) -> Stage {
        match self {
            EmbedError::Validation(_) => Stage::Validate,
            EmbedError::Encode(_) => Stage::Encode,
            EmbedError::MalformedJpeg(_) => Stage::Splice,
        }
    }
}
