use crate::mass::{
    ISOTOPE_SPACING,
    PROTON,
};
use serde::Serialize;

/// Mass differences above this are reported but never explained by isotopes.
pub const LARGE_MISMATCH_THRESHOLD: f64 = 20.0;
pub const BASE_PRECURSOR_TOLERANCE: f64 = 0.15;
pub const PER_CHARGE_PRECURSOR_TOLERANCE: f64 = 0.05;

/// Outcome of comparing the observed precursor mass with the candidate mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PrecursorCheck {
    /// The difference is a whole number of isotope spacings.
    Consistent { delta_mass: f64, isotope_offset: i32 },
    Inconsistent { delta_mass: f64 },
    LargeMismatch { delta_mass: f64 },
}

impl PrecursorCheck {
    /// `observed_mh` is the singly protonated precursor mass.
    ///
    /// Example:
    /// ```
    /// use ascore::scoring::PrecursorCheck;
    /// let check = PrecursorCheck::evaluate(1000.0, 1000.0 + 2.0 * 1.00335 + 1.007276, 2);
    /// assert!(matches!(check, PrecursorCheck::Consistent { isotope_offset: 2, .. }));
    /// ```
    pub fn evaluate(theoretical_mass: f64, observed_mh: f64, charge: u8) -> Self {
        let delta_mass = observed_mh - PROTON - theoretical_mass;
        if delta_mass.abs() > LARGE_MISMATCH_THRESHOLD {
            return PrecursorCheck::LargeMismatch { delta_mass };
        }
        let isotope_offset = (delta_mass / ISOTOPE_SPACING).round();
        let residual = (delta_mass - isotope_offset * ISOTOPE_SPACING).abs();
        let tolerance = BASE_PRECURSOR_TOLERANCE + charge as f64 * PER_CHARGE_PRECURSOR_TOLERANCE;
        if residual <= tolerance {
            PrecursorCheck::Consistent {
                delta_mass,
                isotope_offset: isotope_offset as i32,
            }
        } else {
            PrecursorCheck::Inconsistent { delta_mass }
        }
    }

    pub fn delta_mass(&self) -> f64 {
        match self {
            PrecursorCheck::Consistent { delta_mass, .. }
            | PrecursorCheck::Inconsistent { delta_mass }
            | PrecursorCheck::LargeMismatch { delta_mass } => *delta_mass,
        }
    }

    pub fn is_consistent(&self) -> bool {
        matches!(self, PrecursorCheck::Consistent { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrecursorCheck::Consistent { .. } => "consistent",
            PrecursorCheck::Inconsistent { .. } => "inconsistent",
            PrecursorCheck::LargeMismatch { .. } => "large_mismatch",
        }
    }
}
