use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::EmbedError;
use crate::exif;
use crate::jpeg;
use crate::metadata::{CargoMetadata, GpsCoordinate};

/// Embed cargo metadata into a JPEG, returning the new file contents.
///
/// Runs validate → build → encode → splice and returns the first error. No
/// state is kept between calls and the source bytes are never modified; on
/// error no output is produced at all.
///
/// # Example
///
/// ```rust,no_run
/// use cargo_exif::{CargoMetadata, GpsCoordinate, embed};
///
/// let photo = std::fs::read("photo.jpg").unwrap();
/// let meta = CargoMetadata {
///     id: "CNT-0042".into(),
///     desc: "Palletised machine parts".into(),
///     ..Default::default()
/// };
/// let tagged = embed(&photo, &meta, &GpsCoordinate::new(47.3769, 8.5417)).unwrap();
/// std::fs::write("tagged.jpg", tagged).unwrap();
/// ```
pub fn embed(
    source: &[u8],
    meta: &CargoMetadata,
    gps: &GpsCoordinate,
) -> Result<Vec<u8>, EmbedError> {
    exif::validate(meta, gps)?;
    let ifds = exif::build(meta, gps);
    let payload = exif::encode(&ifds)?;
    let output = jpeg::splice(source, &payload)?;
    Ok(output)
}

/// What [`embed_file`] did.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedOutcome {
    pub source: PathBuf,
    pub output_path: PathBuf,
    pub bytes: usize,
    pub gps_written: bool,
    /// `true` when the file was actually written (not a dry run).
    pub written: bool,
}

/// `<prefix>_<millis>.jpg`
pub fn output_file_name(prefix: &str, timestamp_millis: u128) -> String {
    format!("{prefix}_{timestamp_millis}.jpg")
}

fn now_millis() -> Result<u128> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    Ok(elapsed.as_millis())
}

/// Read a photo, embed the metadata and save the result as a new file in the
/// configured output directory.
///
/// The source file is left untouched. Nothing is written when embedding
/// fails or when `config.output.dry_run` is set.
pub fn embed_file(
    source: &Path,
    meta: &CargoMetadata,
    gps: &GpsCoordinate,
    config: &Config,
) -> Result<EmbedOutcome> {
    let bytes = std::fs::read(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let output = embed(&bytes, meta, gps)
        .with_context(|| format!("Failed to embed metadata into {}", source.display()))?;

    let dir = config.output_dir()?;
    let output_path = dir.join(output_file_name(&config.output.file_prefix, now_millis()?));

    let written = if config.output.dry_run {
        log::debug!("Dry run, not writing {}", output_path.display());
        false
    } else {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        write_atomic(&output_path, &output)?;
        log::info!("Saved {} ({} bytes)", output_path.display(), output.len());
        true
    };

    Ok(EmbedOutcome {
        source: source.to_path_buf(),
        output_path,
        bytes: output.len(),
        gps_written: gps.coordinate().is_some(),
        written,
    })
}

/// Write to a sibling temp file, then rename over `path`, so readers never
/// see a partial file.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("jpg.tmp");
    std::fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("Failed to move output into {}", path.display()));
    }
    Ok(())
}
