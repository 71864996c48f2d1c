use serde::{Deserialize, Serialize};

/// Cargo fields entered by an operator.
///
/// All fields are free-form display strings. Dimensions and weight are not
/// parsed as numbers; they are written verbatim into the EXIF UserComment.
///
/// # Example
///
/// ```rust
/// use cargo_exif::CargoMetadata;
///
/// let meta = CargoMetadata {
///     id: "CNT-0042".into(),
///     desc: "Palletised machine parts".into(),
///     length: "120".into(),
///     width: "80".into(),
///     height: "95".into(),
///     weight: "310 kg".into(),
/// };
/// assert_eq!(meta.dimensions_comment(), "L:120 W:80 H:95 WT:310 kg");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoMetadata {
    pub id: String,
    pub desc: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub weight: String,
}

impl CargoMetadata {
    /// Value written to the `Make` tag.
    pub fn make(&self) -> String {
        format!("CargoID:{}", self.id)
    }

    /// Value written to the `UserComment` tag.
    pub fn dimensions_comment(&self) -> String {
        format!(
            "L:{} W:{} H:{} WT:{}",
            self.length, self.width, self.height, self.weight
        )
    }

    /// Every text field paired with its name, in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("id", self.id.as_str()),
            ("desc", self.desc.as_str()),
            ("length", self.length.as_str()),
            ("width", self.width.as_str()),
            ("height", self.height.as_str()),
            ("weight", self.weight.as_str()),
        ]
    }
}

/// A GPS position from the location collaborator.
///
/// Both halves are optional. A coordinate is only considered present when
/// *both* `lat` and `lon` are set; a missing half means "no GPS data", which is
/// different from a literal `0.0, 0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinate {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl GpsCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// No coordinate.
    pub fn none() -> Self {
        Self::default()
    }

    /// The `(lat, lon)` pair, if both halves are present.
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_prefixes_cargo_id() {
        let meta = CargoMetadata {
            id: "A-17".into(),
            ..Default::default()
        };
        assert_eq!(meta.make(), "CargoID:A-17");
    }

    #[test]
    fn dimensions_comment_keeps_empty_fields() {
        let meta = CargoMetadata::default();
        assert_eq!(meta.dimensions_comment(), "L: W: H: WT:");
    }

    #[test]
    fn coordinate_requires_both_halves() {
        assert_eq!(GpsCoordinate::new(1.0, 2.0).coordinate(), Some((1.0, 2.0)));
        assert_eq!(GpsCoordinate::none().coordinate(), None);

        let half = GpsCoordinate {
            lat: Some(47.0),
            lon: None,
        };
        assert_eq!(half.coordinate(), None);
    }

    #[test]
    fn zero_coordinate_is_present() {
        assert_eq!(GpsCoordinate::new(0.0, 0.0).coordinate(), Some((0.0, 0.0)));
    }
}
