//! # cargo-exif
//!
//! Embed cargo metadata — identifier, description, dimensions, weight and GPS
//! position — into a JPEG photo as standard EXIF tags, so any EXIF-aware
//! viewer or ingestion pipeline can read it without a sidecar file.
//!
//! ## Quick Start
//!
//! [`embed`] is a pure function over bytes: validate → build directories →
//! encode TIFF/EXIF → splice the APP1 segment into the JPEG.
//!
//! ```rust,no_run
//! use cargo_exif::{CargoMetadata, GpsCoordinate, embed};
//!
//! fn main() -> anyhow::Result<()> {
//!     let photo = std::fs::read("photo.jpg")?;
//!
//!     let meta = CargoMetadata {
//!         id: "CNT-0042".into(),
//!         desc: "Palletised machine parts".into(),
//!         length: "120".into(),
//!         width: "80".into(),
//!         height: "95".into(),
//!         weight: "310".into(),
//!     };
//!     let gps = GpsCoordinate::new(47.3769, 8.5417);
//!
//!     let tagged = embed(&photo, &meta, &gps)?;
//!     std::fs::write("cargo_tagged.jpg", tagged)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Tags Written
//!
//! | Tag | Directory | Value |
//! |-----|-----------|-------|
//! | ImageDescription (0x010E) | Image | `desc` |
//! | Make (0x010F) | Image | `CargoID:<id>` |
//! | UserComment (0x9286) | Photo | `L:<length> W:<width> H:<height> WT:<weight>` |
//! | GPSLatitudeRef / GPSLatitude (0x0001 / 0x0002) | GPS | `N`/`S`, DMS |
//! | GPSLongitudeRef / GPSLongitude (0x0003 / 0x0004) | GPS | `E`/`W`, DMS |
//!
//! The GPS directory is only written when both latitude and longitude are set.
//!
//! ## Modules
//!
//! - [`exif`] — DMS rationals, validation, directory building, TIFF encoding, reading back
//! - [`jpeg`] — JPEG marker walking and EXIF segment replacement
//! - [`pipeline`] — [`embed`] and the file-level [`pipeline::embed_file`]
//! - [`config`] — Configuration types and loading/saving

pub mod config;
pub mod error;
pub mod exif;
pub mod jpeg;
pub mod metadata;
pub mod pipeline;

pub use error::{EmbedError, EncodeError, MalformedJpegError, Stage, ValidationError};
pub use metadata::{CargoMetadata, GpsCoordinate};
pub use pipeline::embed;
