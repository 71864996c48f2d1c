use std::collections::BTreeMap;

use super::rational::{Rational, encode_dms};
use crate::metadata::{CargoMetadata, GpsCoordinate};

// Image (IFD0)
pub const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
pub const TAG_GPS_IFD_POINTER: u16 = 0x8825;
// Photo (Exif IFD)
pub const TAG_USER_COMMENT: u16 = 0x9286;
// GPS IFD
pub const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
pub const TAG_GPS_LATITUDE: u16 = 0x0002;
pub const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
pub const TAG_GPS_LONGITUDE: u16 = 0x0004;

/// A typed tag value. Only the TIFF kinds this crate writes are representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExifValue {
    /// TIFF ASCII (type 2). Written with a trailing NUL.
    Ascii(String),
    /// TIFF RATIONAL (type 5), count 1.
    Rational(Rational),
    /// TIFF RATIONAL (type 5), count 3. Used for degrees/minutes/seconds.
    RationalTriple([Rational; 3]),
    /// TIFF SHORT (type 3), count 1.
    Short(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfdKind {
    Image,
    Photo,
    Gps,
}

/// One image file directory: unique tag ids, always iterated in ascending
/// order as TIFF requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ifd {
    kind: IfdKind,
    entries: BTreeMap<u16, ExifValue>,
}

impl Ifd {
    pub fn new(kind: IfdKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> IfdKind {
        self.kind
    }

    /// Set a tag, returning the value it replaced.
    pub fn insert(&mut self, tag: u16, value: ExifValue) -> Option<ExifValue> {
        self.entries.insert(tag, value)
    }

    pub fn get(&self, tag: u16) -> Option<&ExifValue> {
        self.entries.get(&tag)
    }

    pub fn contains(&self, tag: u16) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Entries in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &ExifValue)> {
        self.entries.iter().map(|(tag, value)| (*tag, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The directories written for one embedding request.
///
/// Sub-directory pointers (`ExifIFDPointer`, `GPSIFDPointer`) are not stored
/// here; the encoder adds them once it knows where each directory lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdSet {
    pub image: Ifd,
    pub photo: Ifd,
    /// `None` when no coordinate was supplied.
    pub gps: Option<Ifd>,
}

/// Map validated cargo metadata onto the fixed tag catalog.
pub fn build(meta: &CargoMetadata, gps: &GpsCoordinate) -> IfdSet {
    let mut image = Ifd::new(IfdKind::Image);
    image.insert(TAG_IMAGE_DESCRIPTION, ExifValue::Ascii(meta.desc.clone()));
    image.insert(TAG_MAKE, ExifValue::Ascii(meta.make()));

    let mut photo = Ifd::new(IfdKind::Photo);
    photo.insert(TAG_USER_COMMENT, ExifValue::Ascii(meta.dimensions_comment()));

    let gps = gps.coordinate().map(|(lat, lon)| {
        let lat_ref = if lat >= 0.0 { "N" } else { "S" };
        let lon_ref = if lon >= 0.0 { "E" } else { "W" };

        let mut ifd = Ifd::new(IfdKind::Gps);
        ifd.insert(TAG_GPS_LATITUDE_REF, ExifValue::Ascii(lat_ref.to_string()));
        ifd.insert(TAG_GPS_LATITUDE, ExifValue::RationalTriple(encode_dms(lat.abs())));
        ifd.insert(TAG_GPS_LONGITUDE_REF, ExifValue::Ascii(lon_ref.to_string()));
        ifd.insert(TAG_GPS_LONGITUDE, ExifValue::RationalTriple(encode_dms(lon.abs())));
        ifd
    });

    IfdSet { image, photo, gps }
}
