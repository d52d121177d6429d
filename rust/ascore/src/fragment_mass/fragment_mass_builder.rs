use super::theoretical_spectrum::TheoreticalSpectrum;
use crate::config::{
    AScoreParameters,
    FragmentationType,
};
use crate::errors::{
    DataProcessingError,
    PsmError,
};
use crate::mass::MassType;
use crate::models::{
    ModificationId,
    ModificationRegistry,
};

pub const DEFAULT_MIN_MZ: f64 = 50.0;
pub const DEFAULT_MAX_MZ: f64 = 2000.0;
/// Ions below this fraction of the precursor m/z fall outside the ion trap scan range.
pub const CID_LOW_MASS_CUTOFF: f64 = 0.28;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MzRange {
    pub start: f64,
    pub end: f64,
}

impl MzRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window of fragment m/z values worth scoring.
    ///
    /// `precursor_mh` is the singly protonated precursor mass.
    pub fn for_fragmentation(
        fragmentation: FragmentationType,
        precursor_mz: f64,
        precursor_mh: f64,
    ) -> Self {
        match fragmentation {
            FragmentationType::Cid => Self::new(
                precursor_mz * CID_LOW_MASS_CUTOFF,
                DEFAULT_MAX_MZ.min(precursor_mh),
            ),
            _ => Self::new(DEFAULT_MIN_MZ, DEFAULT_MAX_MZ),
        }
    }

    pub fn contains(&self, mz: f64) -> bool {
        mz >= self.start && mz <= self.end
    }
}

impl Default for MzRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_MZ, DEFAULT_MAX_MZ)
    }
}

/// Builds the scored ion list of every candidate of one PSM.
///
/// Fragment charges run from 1 up to `precursor_charge - 1` (at least 1).
/// Charges above 1 use average masses when the tolerance is tight.
#[derive(Debug)]
pub struct FragmentMassBuilder<'a> {
    registry: &'a ModificationRegistry,
    monoisotopic: TheoreticalSpectrum,
    average: Option<TheoreticalSpectrum>,
    fragment_charges: Vec<(u8, MassType)>,
    mz_range: MzRange,
}

impl<'a> FragmentMassBuilder<'a> {
    pub fn new(
        sequence: &str,
        params: &'a AScoreParameters,
        precursor_charge: u8,
        mz_range: MzRange,
    ) -> Result<Self, PsmError> {
        let max_charge = precursor_charge.saturating_sub(1).max(1);
        let fragment_charges: Vec<(u8, MassType)> = (1..=max_charge)
            .map(|z| (z, params.fragment_mass_type(z)))
            .collect();

        let monoisotopic = TheoreticalSpectrum::new(sequence, params, MassType::Monoisotopic)?;
        let average = if fragment_charges
            .iter()
            .any(|(_, mt)| *mt == MassType::Average)
        {
            Some(TheoreticalSpectrum::new(sequence, params, MassType::Average)?)
        } else {
            None
        };

        Ok(Self {
            registry: &params.dynamic_mods,
            monoisotopic,
            average,
            fragment_charges,
            mz_range,
        })
    }

    pub fn max_fragment_charge(&self) -> u8 {
        self.fragment_charges.last().map(|x| x.0).unwrap_or(1)
    }

    /// Neutral monoisotopic mass of the peptide with a given placement.
    pub fn peptide_mass(&self, sites: &[ModificationId]) -> Result<f64, DataProcessingError> {
        self.monoisotopic.modified_peptide_mass(sites, self.registry)
    }

    /// Every in-window fragment m/z of a placement across all fragment charges,
    /// sorted ascending.
    pub fn ion_mzs(&self, sites: &[ModificationId]) -> Result<Vec<f64>, DataProcessingError> {
        let mut out = Vec::new();
        for (charge, mass_type) in self.fragment_charges.iter() {
            let spectrum = match (mass_type, &self.average) {
                (MassType::Average, Some(avg)) => avg,
                _ => &self.monoisotopic,
            };
            let ions = spectrum.charge_state_ions(sites, self.registry, *charge)?;
            out.extend(ions.iter().filter(|mz| self.mz_range.contains(*mz)));
        }
        out.sort_unstable_by(|a, b| a.total_cmp(b));
        Ok(out)
    }
}
