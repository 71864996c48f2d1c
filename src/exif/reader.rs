use anyhow::{Context, Result};
use nom_exif::*;
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;

use crate::metadata::CargoMetadata;

const MAKE_PREFIX: &str = "CargoID:";

/// Cargo metadata recovered from an image's EXIF block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CargoRecord {
    /// ImageDescription
    pub description: Option<String>,
    /// Make, with the `CargoID:` prefix removed.
    pub cargo_id: Option<String>,
    /// UserComment, e.g. `L:120 W:80 H:95 WT:310`.
    pub dimensions: Option<String>,
    pub has_gps: bool,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
}

impl CargoRecord {
    /// Rebuild the operator's fields. `None` unless the cargo id and the
    /// dimensions comment were both found and the comment is well-formed.
    pub fn to_metadata(&self) -> Option<CargoMetadata> {
        let (length, width, height, weight) = split_dimensions(self.dimensions.as_deref()?)?;
        Some(CargoMetadata {
            id: self.cargo_id.clone()?,
            desc: self.description.clone().unwrap_or_default(),
            length: length.to_string(),
            width: width.to_string(),
            height: height.to_string(),
            weight: weight.to_string(),
        })
    }
}

/// Split `L:{length} W:{width} H:{height} WT:{weight}` into its parts.
fn split_dimensions(comment: &str) -> Option<(&str, &str, &str, &str)> {
    let rest = comment.strip_prefix("L:")?;
    let (length, rest) = rest.split_once(" W:")?;
    let (width, rest) = rest.split_once(" H:")?;
    let (height, weight) = rest.split_once(" WT:")?;
    Some((length, width, height, weight))
}

/// Read cargo metadata from in-memory JPEG bytes.
///
/// Returns an empty record when the image has no EXIF block.
pub fn read_cargo(bytes: &[u8]) -> Result<CargoRecord> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::seekable(Cursor::new(bytes.to_vec()))
        .context("Failed to open image data")?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => {
            log::debug!("No EXIF data found");
            return Ok(CargoRecord::default());
        }
    };

    // Parse GPS info before converting to Exif (consumes the iterator)
    let gps_info = iter.parse_gps_info().ok().flatten();
    let exif: Exif = iter.into();

    let mut record = CargoRecord::default();

    if let Some(val) = exif.get(ExifTag::ImageDescription) {
        record.description = entry_to_string(val);
    }

    if let Some(val) = exif.get(ExifTag::Make) {
        record.cargo_id = entry_to_string(val)
            .and_then(|make| make.strip_prefix(MAKE_PREFIX).map(str::to_string));
    }

    if let Some(val) = exif.get(ExifTag::UserComment) {
        record.dimensions = entry_to_string(val);
    }

    if let Some(gps) = gps_info {
        record.has_gps = true;
        record.gps_latitude = Some(latlng_to_decimal(&gps.latitude, gps.latitude_ref));
        record.gps_longitude = Some(latlng_to_decimal(&gps.longitude, gps.longitude_ref));
    }

    Ok(record)
}

/// Read cargo metadata from a JPEG file.
pub fn read_cargo_file(path: &Path) -> Result<CargoRecord> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    read_cargo(&bytes)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = match val.as_str() {
        Some(s) => s.to_string(),
        None => val.to_string(),
    };
    let s = s.trim_end_matches('\0').to_string();
    if s.is_empty() { None } else { Some(s) }
}

/// Convert a nom-exif LatLng (3 URationals: deg, min, sec) to decimal degrees.
fn latlng_to_decimal(latlng: &LatLng, reference: char) -> f64 {
    let degrees = latlng.0.0 as f64 / latlng.0.1 as f64;
    let minutes = latlng.1.0 as f64 / latlng.1.1 as f64;
    let seconds = latlng.2.0 as f64 / latlng.2.1 as f64;

    let coord = degrees + minutes / 60.0 + seconds / 3600.0;

    if reference == 'S' || reference == 'W' {
        -coord
    } else {
        coord
    }
}
