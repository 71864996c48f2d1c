use cargo_exif::exif::{
    EXIF_HEADER, SECONDS_DENOMINATOR, TAG_EXIF_IFD_POINTER, TAG_GPS_IFD_POINTER, read_cargo,
};
use cargo_exif::jpeg::parse_segments;
use cargo_exif::{CargoMetadata, EmbedError, GpsCoordinate, MalformedJpegError, embed};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};

/// Half of the 1/100 second DMS resolution, in degrees.
const GPS_TOLERANCE: f64 = 0.5 / SECONDS_DENOMINATOR.get() as f64 / 3600.0;

/// A structurally valid baseline JPEG header with a JFIF APP0, a quantization
/// table, a frame header and a tiny scan.
fn sample_jpeg() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    // APP0 JFIF
    bytes.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
        0x00, 0x01, 0x00, 0x00,
    ]);
    // DQT
    bytes.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    bytes.extend_from_slice(&[1u8; 64]);
    // SOF0: 8x8, one component
    bytes.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00,
    ]);
    // SOS + entropy data + EOI
    bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    bytes.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

fn scan_region(bytes: &[u8]) -> Vec<u8> {
    parse_segments(bytes).unwrap().scan.to_vec()
}

fn meta() -> CargoMetadata {
    CargoMetadata {
        id: "CNT-0042".into(),
        desc: "Palletised machine parts".into(),
        length: "120".into(),
        width: "80".into(),
        height: "95".into(),
        weight: "310 kg".into(),
    }
}

fn exif_segment_count(bytes: &[u8]) -> usize {
    let jpeg = Jpeg::from_bytes(Bytes::from(bytes.to_vec())).expect("img-parts parses output");
    jpeg.segments()
        .iter()
        .filter(|s| s.marker() == 0xE1 && s.contents().starts_with(EXIF_HEADER))
        .count()
}

// ── round trip through an independent reader ─────────────────────────

#[test]
fn round_trip_with_gps() {
    let out = embed(&sample_jpeg(), &meta(), &GpsCoordinate::new(47.3769, 8.5417)).unwrap();
    let record = read_cargo(&out).unwrap();

    assert_eq!(record.description.as_deref(), Some("Palletised machine parts"));
    assert_eq!(record.cargo_id.as_deref(), Some("CNT-0042"));
    assert_eq!(record.dimensions.as_deref(), Some("L:120 W:80 H:95 WT:310 kg"));
    assert!(record.has_gps);
    assert!((record.gps_latitude.unwrap() - 47.3769).abs() <= GPS_TOLERANCE);
    assert!((record.gps_longitude.unwrap() - 8.5417).abs() <= GPS_TOLERANCE);

    assert_eq!(record.to_metadata(), Some(meta()));
}

#[test]
fn round_trip_southern_western_hemisphere() {
    let out = embed(&sample_jpeg(), &meta(), &GpsCoordinate::new(-33.8688, -70.6693)).unwrap();
    let record = read_cargo(&out).unwrap();
    assert!((record.gps_latitude.unwrap() + 33.8688).abs() <= GPS_TOLERANCE);
    assert!((record.gps_longitude.unwrap() + 70.6693).abs() <= GPS_TOLERANCE);
}

#[test]
fn round_trip_without_gps() {
    let out = embed(&sample_jpeg(), &meta(), &GpsCoordinate::none()).unwrap();
    let record = read_cargo(&out).unwrap();
    assert_eq!(record.cargo_id.as_deref(), Some("CNT-0042"));
    assert!(!record.has_gps);
    assert!(record.gps_latitude.is_none());
}

// ── structure ────────────────────────────────────────────────────────

#[test]
fn output_is_parseable_and_scan_untouched() {
    let source = sample_jpeg();
    let out = embed(&source, &meta(), &GpsCoordinate::new(1.0, 1.0)).unwrap();

    assert_eq!(exif_segment_count(&out), 1);
    assert_eq!(scan_region(&out), scan_region(&source));

    let jpeg = Jpeg::from_bytes(Bytes::from(out)).unwrap();
    assert_eq!(jpeg.segments()[0].marker(), 0xE1);
    let tiff = jpeg.exif().expect("exif present");
    assert_eq!(&tiff[..4], b"II\x2A\x00");
}

#[test]
fn non_exif_segments_keep_their_order() {
    let source = sample_jpeg();
    let out = embed(&source, &meta(), &GpsCoordinate::none()).unwrap();

    let before: Vec<u8> = parse_segments(&source).unwrap().segments.iter().map(|s| s.marker).collect();
    let after: Vec<u8> = parse_segments(&out).unwrap().segments.iter().map(|s| s.marker).collect();
    assert_eq!(after[0], 0xE1);
    assert_eq!(&after[1..], before.as_slice());
}

#[test]
fn reembedding_keeps_a_single_exif_segment_with_latest_values() {
    let first = embed(&sample_jpeg(), &meta(), &GpsCoordinate::new(10.0, 20.0)).unwrap();

    let mut updated = meta();
    updated.id = "CNT-0043".into();
    updated.weight = "295 kg".into();
    let second = embed(&first, &updated, &GpsCoordinate::none()).unwrap();

    assert_eq!(exif_segment_count(&second), 1);
    let record = read_cargo(&second).unwrap();
    assert_eq!(record.cargo_id.as_deref(), Some("CNT-0043"));
    assert_eq!(record.dimensions.as_deref(), Some("L:120 W:80 H:95 WT:295 kg"));
    assert!(!record.has_gps, "GPS from the first call must not survive");
}

#[test]
fn no_gps_pointer_without_coordinate() {
    let out = embed(&sample_jpeg(), &meta(), &GpsCoordinate::none()).unwrap();
    let layout = parse_segments(&out).unwrap();
    let payload = &layout.exif_segments().next().unwrap().payload;
    let tiff = &payload[EXIF_HEADER.len()..];

    let count = u16::from_le_bytes([tiff[8], tiff[9]]) as usize;
    let tags: Vec<u16> = (0..count)
        .map(|i| u16::from_le_bytes([tiff[10 + i * 12], tiff[11 + i * 12]]))
        .collect();
    assert!(tags.contains(&TAG_EXIF_IFD_POINTER));
    assert!(!tags.contains(&TAG_GPS_IFD_POINTER));
}

#[test]
fn half_coordinate_means_no_gps() {
    let gps = GpsCoordinate {
        lat: Some(47.0),
        lon: None,
    };
    let out = embed(&sample_jpeg(), &meta(), &gps).unwrap();
    assert!(!read_cargo(&out).unwrap().has_gps);
}

// ── failures ─────────────────────────────────────────────────────────

#[test]
fn non_ascii_description_produces_no_output() {
    let mut m = meta();
    m.desc = "Größe".into();
    assert!(matches!(
        embed(&sample_jpeg(), &m, &GpsCoordinate::none()),
        Err(EmbedError::Validation(_))
    ));
}

#[test]
fn missing_soi_produces_no_output() {
    let mut bytes = sample_jpeg();
    bytes[1] = 0x00;
    assert_eq!(
        embed(&bytes, &meta(), &GpsCoordinate::none()),
        Err(EmbedError::MalformedJpeg(MalformedJpegError::MissingSoi))
    );
}

#[test]
fn truncated_header_produces_no_output() {
    let bytes = sample_jpeg();
    // Cut inside the quantization table.
    assert!(matches!(
        embed(&bytes[..40], &meta(), &GpsCoordinate::none()),
        Err(EmbedError::MalformedJpeg(MalformedJpegError::TruncatedSegment { marker: 0xDB, .. }))
    ));
}
