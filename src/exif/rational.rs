use std::num::NonZeroU32;

/// Denominator of the seconds component: GPS seconds carry 1/100 s precision.
pub const SECONDS_DENOMINATOR: NonZeroU32 = match NonZeroU32::new(100) {
    Some(d) => d,
    None => unreachable!(),
};

/// An unsigned TIFF RATIONAL (two LONGs). The denominator is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: u32,
    pub denom: NonZeroU32,
}

impl Rational {
    /// Returns `None` when `denom` is zero.
    pub fn new(num: u32, denom: u32) -> Option<Self> {
        NonZeroU32::new(denom).map(|denom| Self { num, denom })
    }

    /// `num / 1`.
    pub const fn whole(num: u32) -> Self {
        Self {
            num,
            denom: NonZeroU32::MIN,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.denom.get() as f64
    }
}

/// Convert a non-negative decimal degree value into a degree/minute/second
/// rational triple, as stored in `GPSLatitude` / `GPSLongitude`.
///
/// Degrees and minutes are whole numbers; seconds are `n/100`, rounded half
/// up. A seconds value that rounds to 60.00 carries into the minutes (and a
/// 60th minute into the degrees), so the result is always normalized.
///
/// The caller passes `abs(lat)` or `abs(lon)`; the hemisphere is stored
/// separately as a reference letter. Input is clamped to `0.0..=180.0`.
///
/// ```rust
/// use cargo_exif::exif::encode_dms;
///
/// let [d, m, s] = encode_dms(47.3769);
/// assert_eq!((d.num, m.num, s.num, s.denom.get()), (47, 22, 3684, 100));
/// ```
pub fn encode_dms(value: f64) -> [Rational; 3] {
    let value = value.clamp(0.0, 180.0);

    let deg = value.floor();
    let min_frac = (value - deg) * 60.0;
    let min = min_frac.floor();
    let sec_frac = (min_frac - min) * 60.0;

    // Float-to-int casts saturate, and NaN becomes 0.
    let mut deg = deg as u32;
    let mut min = min as u32;
    let mut sec_num = (sec_frac * 100.0).round() as u32;

    let full_minute = 60 * SECONDS_DENOMINATOR.get();
    if sec_num >= full_minute {
        sec_num -= full_minute;
        min += 1;
    }
    if min >= 60 {
        min -= 60;
        deg += 1;
    }

    [
        Rational::whole(deg),
        Rational::whole(min),
        Rational {
            num: sec_num,
            denom: SECONDS_DENOMINATOR,
        },
    ]
}

/// Inverse of [`encode_dms`]: degrees + minutes/60 + seconds/3600.
pub fn dms_to_decimal(dms: &[Rational; 3]) -> f64 {
    dms[0].to_f64() + dms[1].to_f64() / 60.0 + dms[2].to_f64() / 3600.0
}
