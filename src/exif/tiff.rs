use super::ifd::{ExifValue, Ifd, IfdSet, TAG_EXIF_IFD_POINTER, TAG_GPS_IFD_POINTER};
use crate::error::EncodeError;

/// Prefix of every EXIF APP1 payload.
pub const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Largest payload a JPEG segment can carry: the 16-bit length field counts
/// itself, so 65535 - 2.
pub const MAX_PAYLOAD_LEN: usize = 65533;

/// Little-endian byte order, magic 42, first IFD right after the header.
const TIFF_HEADER: [u8; 8] = [b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
const IFD_ENTRY_LEN: usize = 12;

// TIFF field types
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

/// A complete APP1 payload: `"Exif\0\0"` followed by a TIFF structure.
///
/// Only [`encode`] or [`ExifPayload::from_tiff`] construct one, so the
/// header is always present and the length always fits a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifPayload(Vec<u8>);

impl ExifPayload {
    /// Wrap raw TIFF bytes, prepending the EXIF header.
    pub fn from_tiff(tiff: &[u8]) -> Result<Self, EncodeError> {
        let size = EXIF_HEADER.len() + tiff.len();
        if size > MAX_PAYLOAD_LEN {
            return Err(EncodeError::SegmentTooLarge { size });
        }
        let mut bytes = Vec::with_capacity(size);
        bytes.extend_from_slice(EXIF_HEADER);
        bytes.extend_from_slice(tiff);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The TIFF structure, without the EXIF header.
    pub fn tiff(&self) -> &[u8] {
        &self.0[EXIF_HEADER.len()..]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for ExifPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// One IFD entry with its value already serialized little-endian.
struct RawEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

impl RawEntry {
    fn from_value(tag: u16, value: &ExifValue) -> Self {
        match value {
            ExifValue::Ascii(text) => {
                let mut data = text.as_bytes().to_vec();
                data.push(0);
                Self {
                    tag,
                    field_type: TYPE_ASCII,
                    count: data.len() as u32,
                    data,
                }
            }
            ExifValue::Short(v) => Self {
                tag,
                field_type: TYPE_SHORT,
                count: 1,
                data: v.to_le_bytes().to_vec(),
            },
            ExifValue::Rational(r) => {
                let mut data = Vec::with_capacity(8);
                data.extend_from_slice(&r.num.to_le_bytes());
                data.extend_from_slice(&r.denom.get().to_le_bytes());
                Self {
                    tag,
                    field_type: TYPE_RATIONAL,
                    count: 1,
                    data,
                }
            }
            ExifValue::RationalTriple(parts) => {
                let mut data = Vec::with_capacity(24);
                for r in parts {
                    data.extend_from_slice(&r.num.to_le_bytes());
                    data.extend_from_slice(&r.denom.get().to_le_bytes());
                }
                Self {
                    tag,
                    field_type: TYPE_RATIONAL,
                    count: 3,
                    data,
                }
            }
        }
    }

    /// A sub-IFD pointer. The offset is filled in once the layout is known.
    fn pointer(tag: u16) -> Self {
        Self {
            tag,
            field_type: TYPE_LONG,
            count: 1,
            data: vec![0; 4],
        }
    }

    fn set_offset(&mut self, offset: u32) {
        self.data = offset.to_le_bytes().to_vec();
    }

    fn is_inline(&self) -> bool {
        self.data.len() <= 4
    }
}

fn word_aligned(len: usize) -> usize {
    len + (len & 1)
}

fn raw_entries(ifd: &Ifd) -> Vec<RawEntry> {
    ifd.iter()
        .filter(|(tag, _)| *tag != TAG_EXIF_IFD_POINTER && *tag != TAG_GPS_IFD_POINTER)
        .map(|(tag, value)| RawEntry::from_value(tag, value))
        .collect()
}

/// Bytes a directory occupies: count, entries, next-IFD offset, overflow area.
fn directory_len(entries: &[RawEntry]) -> usize {
    let overflow: usize = entries
        .iter()
        .filter(|e| !e.is_inline())
        .map(|e| word_aligned(e.data.len()))
        .sum();
    2 + entries.len() * IFD_ENTRY_LEN + 4 + overflow
}

/// Append one directory at `tiff.len()`. Entries must already be sorted.
fn write_directory(tiff: &mut Vec<u8>, entries: &[RawEntry]) {
    let start = tiff.len();
    let mut overflow_offset = start + 2 + entries.len() * IFD_ENTRY_LEN + 4;
    let mut overflow = Vec::new();

    tiff.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        tiff.extend_from_slice(&entry.tag.to_le_bytes());
        tiff.extend_from_slice(&entry.field_type.to_le_bytes());
        tiff.extend_from_slice(&entry.count.to_le_bytes());
        if entry.is_inline() {
            let mut inline = [0u8; 4];
            inline[..entry.data.len()].copy_from_slice(&entry.data);
            tiff.extend_from_slice(&inline);
        } else {
            tiff.extend_from_slice(&(overflow_offset as u32).to_le_bytes());
            overflow.extend_from_slice(&entry.data);
            if entry.data.len() % 2 == 1 {
                overflow.push(0);
            }
            overflow_offset += word_aligned(entry.data.len());
        }
    }
    // No IFD1: this crate never writes a thumbnail.
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&overflow);
}

/// Serialize the directories into an APP1 payload.
///
/// Layout after the EXIF header, offsets relative to the TIFF header:
///
/// ```text
/// 0      TIFF header ("II", 42, offset 8)
/// 8      Image IFD  + overflow   (ExifIFDPointer, GPSIFDPointer added here)
/// ...    Photo IFD  + overflow
/// ...    GPS IFD    + overflow   (only if present)
/// ```
///
/// Any pointer tags already present in `ifds.image` are replaced with the
/// computed ones. The total size is checked before any bytes are written.
pub fn encode(ifds: &IfdSet) -> Result<ExifPayload, EncodeError> {
    let mut image = raw_entries(&ifds.image);
    let photo = raw_entries(&ifds.photo);
    let gps = ifds.gps.as_ref().map(raw_entries);

    image.push(RawEntry::pointer(TAG_EXIF_IFD_POINTER));
    if gps.is_some() {
        image.push(RawEntry::pointer(TAG_GPS_IFD_POINTER));
    }
    image.sort_by_key(|e| e.tag);

    let image_start = TIFF_HEADER.len();
    let photo_start = image_start + directory_len(&image);
    let gps_start = photo_start + directory_len(&photo);
    let tiff_len = gps_start + gps.as_deref().map_or(0, directory_len);

    let size = EXIF_HEADER.len() + tiff_len;
    if size > MAX_PAYLOAD_LEN {
        return Err(EncodeError::SegmentTooLarge { size });
    }

    for entry in &mut image {
        match entry.tag {
            TAG_EXIF_IFD_POINTER => entry.set_offset(photo_start as u32),
            TAG_GPS_IFD_POINTER => entry.set_offset(gps_start as u32),
            _ => {}
        }
    }

    let mut tiff = Vec::with_capacity(tiff_len);
    tiff.extend_from_slice(&TIFF_HEADER);
    write_directory(&mut tiff, &image);
    write_directory(&mut tiff, &photo);
    if let Some(gps) = &gps {
        write_directory(&mut tiff, gps);
    }
    debug_assert_eq!(tiff.len(), tiff_len);

    log::debug!(
        "Encoded EXIF payload: {} bytes ({} image, {} photo, {} gps entries)",
        size,
        image.len(),
        photo.len(),
        gps.as_ref().map_or(0, Vec::len)
    );

    ExifPayload::from_tiff(&tiff)
}
