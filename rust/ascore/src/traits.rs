//! Trait definitions for spectrum lookup.

use crate::spectrum::ExperimentalSpectrum;
use std::collections::HashMap;

/// Anything the scoring pipeline can fetch spectra from.
///
/// Implementations are shared between rayon workers, so they must be `Sync`.
pub trait SpectrumSource: Sync {
    /// Spectrum for a scan at a given charge.
    ///
    /// Implementations may fall back to any spectrum of the scan when the
    /// charge does not match.
    fn get_spectrum(&self, scan: u32, charge: u8) -> Option<&ExperimentalSpectrum>;
}

impl SpectrumSource for HashMap<(u32, u8), ExperimentalSpectrum> {
    fn get_spectrum(&self, scan: u32, charge: u8) -> Option<&ExperimentalSpectrum> {
        self.get(&(scan, charge))
    }
}
