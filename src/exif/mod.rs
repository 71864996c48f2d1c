//! EXIF construction and reading.
//!
//! Writing runs leaves-first through four steps:
//!
//! - [`encode_dms`] — decimal degrees to a degree/minute/second rational triple
//! - [`validate`] — reject non-ASCII text and out-of-range coordinates
//! - [`build`] — map cargo metadata onto the Image, Photo and GPS directories
//! - [`encode`] — serialize the directories into an `"Exif\0\0"` APP1 payload
//!
//! [`read_cargo`] goes the other way using `nom-exif`, an independent parser.

mod ifd;
mod rational;
mod reader;
mod tiff;
mod validate;

pub use ifd::{
    ExifValue, Ifd, IfdKind, IfdSet, TAG_EXIF_IFD_POINTER, TAG_GPS_IFD_POINTER,
    TAG_GPS_LATITUDE, TAG_GPS_LATITUDE_REF, TAG_GPS_LONGITUDE, TAG_GPS_LONGITUDE_REF,
    TAG_IMAGE_DESCRIPTION, TAG_MAKE, TAG_USER_COMMENT, build,
};
pub use rational::{Rational, SECONDS_DENOMINATOR, dms_to_decimal, encode_dms};
pub use reader::{CargoRecord, read_cargo, read_cargo_file};
pub use tiff::{EXIF_HEADER, ExifPayload, MAX_PAYLOAD_LEN, encode};
pub use validate::validate;
