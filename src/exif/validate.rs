use crate::error::ValidationError;
use crate::metadata::{CargoMetadata, GpsCoordinate};

/// Check cargo fields and coordinates before any EXIF bytes are built.
///
/// EXIF ASCII tags are null-terminated 7-bit strings, so every field must be
/// ASCII and free of NUL bytes. Non-ASCII input is rejected rather than
/// transcoded. A coordinate is only range-checked when both halves are present.
pub fn validate(meta: &CargoMetadata, gps: &GpsCoordinate) -> Result<(), ValidationError> {
    for (field, value) in meta.fields() {
        if !value.is_ascii() {
            return Err(ValidationError::InvalidMetadata {
                field,
                reason: "contains non-ASCII characters",
            });
        }
        if value.contains('\0') {
            return Err(ValidationError::InvalidMetadata {
                field,
                reason: "contains a NUL byte",
            });
        }
    }

    if let Some((lat, lon)) = gps.coordinate() {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::GpsOutOfRange { lat, lon });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> CargoMetadata {
        CargoMetadata {
            id: "C-1".into(),
            desc: "Crates of bolts".into(),
            length: "1.2".into(),
            width: "0.8".into(),
            height: "1.0".into(),
            weight: "450".into(),
        }
    }

    // ── text fields ──────────────────────────────────────────────────

    #[test]
    fn ascii_fields_pass() {
        assert_eq!(validate(&meta(), &GpsCoordinate::none()), Ok(()));
    }

    #[test]
    fn empty_fields_pass() {
        assert_eq!(validate(&CargoMetadata::default(), &GpsCoordinate::none()), Ok(()));
    }

    #[test]
    fn non_ascii_description_rejected() {
        let mut m = meta();
        m.desc = "Käse".into();
        assert_eq!(
            validate(&m, &GpsCoordinate::none()),
            Err(ValidationError::InvalidMetadata {
                field: "desc",
                reason: "contains non-ASCII characters",
            })
        );
    }

    #[test]
    fn non_ascii_reports_the_offending_field() {
        let mut m = meta();
        m.weight = "450 ㎏".into();
        match validate(&m, &GpsCoordinate::none()) {
            Err(ValidationError::InvalidMetadata { field, .. }) => assert_eq!(field, "weight"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn embedded_nul_rejected() {
        let mut m = meta();
        m.id = "C\0-1".into();
        assert!(matches!(
            validate(&m, &GpsCoordinate::none()),
            Err(ValidationError::InvalidMetadata { field: "id", .. })
        ));
    }

    // ── GPS ──────────────────────────────────────────────────────────

    #[test]
    fn gps_bounds_are_inclusive() {
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            assert_eq!(validate(&meta(), &GpsCoordinate::new(lat, lon)), Ok(()));
        }
    }

    #[test]
    fn latitude_out_of_range() {
        assert_eq!(
            validate(&meta(), &GpsCoordinate::new(90.5, 10.0)),
            Err(ValidationError::GpsOutOfRange { lat: 90.5, lon: 10.0 })
        );
    }

    #[test]
    fn longitude_out_of_range() {
        assert!(matches!(
            validate(&meta(), &GpsCoordinate::new(10.0, -180.01)),
            Err(ValidationError::GpsOutOfRange { .. })
        ));
    }

    #[test]
    fn nan_is_out_of_range() {
        assert!(matches!(
            validate(&meta(), &GpsCoordinate::new(f64::NAN, 0.0)),
            Err(ValidationError::GpsOutOfRange { .. })
        ));
    }

    #[test]
    fn half_coordinate_is_not_checked() {
        let gps = GpsCoordinate {
            lat: Some(500.0),
            lon: None,
        };
        assert_eq!(validate(&meta(), &gps), Ok(()));
    }

    #[test]
    fn text_checked_before_gps() {
        let mut m = meta();
        m.desc = "é".into();
        assert!(matches!(
            validate(&m, &GpsCoordinate::new(100.0, 0.0)),
            Err(ValidationError::InvalidMetadata { .. })
        ));
    }
}
