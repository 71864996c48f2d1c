//! JPEG marker-stream walking and EXIF segment replacement.
//!
//! Only the header segments are parsed. Everything from start-of-scan onward
//! (entropy-coded data, restart markers, end-of-image, trailing bytes) is
//! carried through untouched.

use crate::error::MalformedJpegError;
use crate::exif::{EXIF_HEADER, ExifPayload};

pub const MARKER_PREFIX: u8 = 0xFF;
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const APP1: u8 = 0xE1;
const TEM: u8 = 0x01;
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;

/// One header segment: the byte after `0xFF` and its payload (without the
/// length field). Standalone markers have an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegSegment {
    pub marker: u8,
    pub payload: Vec<u8>,
}

impl JpegSegment {
    /// Markers that are not followed by a length field.
    pub fn is_standalone(marker: u8) -> bool {
        matches!(marker, TEM | SOI | EOI | RST0..=RST7)
    }

    pub fn is_exif(&self) -> bool {
        self.marker == APP1 && self.payload.starts_with(EXIF_HEADER)
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(MARKER_PREFIX);
        out.push(self.marker);
        if !Self::is_standalone(self.marker) {
            out.extend_from_slice(&((self.payload.len() + 2) as u16).to_be_bytes());
            out.extend_from_slice(&self.payload);
        }
    }
}

/// A JPEG split into header segments and the opaque scan region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegLayout<'a> {
    /// Segments between start-of-image and start-of-scan, in file order.
    pub segments: Vec<JpegSegment>,
    /// From the start-of-scan (or end-of-image) marker to the end of the buffer.
    pub scan: &'a [u8],
}

impl JpegLayout<'_> {
    pub fn exif_segments(&self) -> impl Iterator<Item = &JpegSegment> {
        self.segments.iter().filter(|s| s.is_exif())
    }
}

/// Walk the header segments of `bytes`.
///
/// Every iteration consumes at least two bytes and all reads are bounded by
/// the buffer length, so the walk terminates on any input.
pub fn parse_segments(bytes: &[u8]) -> Result<JpegLayout<'_>, MalformedJpegError> {
    if bytes.len() < 2 || bytes[0] != MARKER_PREFIX || bytes[1] != SOI {
        return Err(MalformedJpegError::MissingSoi);
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    while pos < bytes.len() {
        if bytes[pos] != MARKER_PREFIX {
            return Err(MalformedJpegError::ExpectedMarker {
                offset: pos,
                byte: bytes[pos],
            });
        }
        // Any number of 0xFF fill bytes may precede a marker.
        while pos + 1 < bytes.len() && bytes[pos + 1] == MARKER_PREFIX {
            pos += 1;
        }
        let Some(&marker) = bytes.get(pos + 1) else {
            break;
        };

        if marker == SOS || marker == EOI {
            return Ok(JpegLayout {
                segments,
                scan: &bytes[pos..],
            });
        }

        if JpegSegment::is_standalone(marker) {
            segments.push(JpegSegment {
                marker,
                payload: Vec::new(),
            });
            pos += 2;
            continue;
        }

        if pos + 4 > bytes.len() {
            return Err(MalformedJpegError::TruncatedSegment { marker, offset: pos });
        }
        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]);
        if length < 2 {
            return Err(MalformedJpegError::InvalidLength {
                marker,
                offset: pos,
                length,
            });
        }
        let end = pos + 2 + length as usize;
        if end > bytes.len() {
            return Err(MalformedJpegError::TruncatedSegment { marker, offset: pos });
        }

        segments.push(JpegSegment {
            marker,
            payload: bytes[pos + 4..end].to_vec(),
        });
        pos = end;
    }

    Err(MalformedJpegError::UnexpectedEnd)
}

/// Replace the EXIF segment of `source` with `payload`.
///
/// Every existing APP1 segment that starts with `"Exif\0\0"` is dropped. The
/// new APP1 goes directly after start-of-image; the remaining header segments
/// keep their order and the scan region is copied verbatim.
pub fn splice(source: &[u8], payload: &ExifPayload) -> Result<Vec<u8>, MalformedJpegError> {
    let layout = parse_segments(source)?;

    let dropped = layout.exif_segments().count();
    if dropped > 0 {
        log::debug!("Dropping {dropped} existing EXIF segment(s)");
    }

    let mut out = Vec::with_capacity(source.len() + payload.len() + 4);
    out.push(MARKER_PREFIX);
    out.push(SOI);
    out.push(MARKER_PREFIX);
    out.push(APP1);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload.as_bytes());

    for segment in layout.segments.iter().filter(|s| !s.is_exif()) {
        segment.write_to(&mut out);
    }
    out.extend_from_slice(layout.scan);

    log::debug!(
        "Spliced EXIF into JPEG: {} -> {} bytes, {} header segment(s) kept",
        source.len(),
        out.len(),
        layout.segments.len() - dropped
    );

    Ok(out)
}
