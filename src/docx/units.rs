//! Length units used by WordprocessingML.
//!
//! Drawing extents are in EMU, page geometry and paragraph spacing in twips
//! (1/20 pt) and font sizes in half-points.

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;
/// EMUs per centimetre.
pub const EMU_PER_CM: i64 = 360_000;
/// EMUs per point.
pub const EMU_PER_PT: i64 = 12_700;
/// EMUs per twip.
pub const EMU_PER_TWIP: i64 = 635;

/// A length stored in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Length(i64);

impl Length {
    /// Create a length from raw EMUs.
    pub const fn emu(emu: i64) -> Self {
        Self(emu)
    }

    pub fn inches(inches: f64) -> Self {
        Self((inches * EMU_PER_INCH as f64).round() as i64)
    }

    pub fn cm(cm: f64) -> Self {
        Self((cm * EMU_PER_CM as f64).round() as i64)
    }

    pub fn pt(pt: f64) -> Self {
        Self((pt * EMU_PER_PT as f64).round() as i64)
    }

    /// Raw EMU value.
    pub const fn as_emu(self) -> i64 {
        self.0
    }

    /// Value in twips, rounded.
    pub fn as_twips(self) -> i64 {
        (self.0 as f64 / EMU_PER_TWIP as f64).round() as i64
    }

    pub fn as_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

/// Font size in half-points, as used by `w:sz`.
pub fn half_points(pt: f64) -> i64 {
    (pt * 2.0).round() as i64
}

/// Point value in twips, as used by `w:spacing`.
pub fn pt_to_twips(pt: f64) -> i64 {
    (pt * 20.0).round() as i64
}

/// Line spacing multiplier as a `w:line` value with `lineRule="auto"`.
pub fn line_spacing_value(multiplier: f64) -> i64 {
    (multiplier * 240.0).round() as i64
}
