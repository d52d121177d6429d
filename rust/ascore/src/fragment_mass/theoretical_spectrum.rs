use crate::config::{
    AScoreParameters,
    FragmentationType,
};
use crate::errors::{
    DataProcessingError,
    PsmError,
};
use crate::mass::{
    MassType,
    PROTON,
};
use crate::models::{
    ModificationId,
    ModificationRegistry,
    Terminus,
};

/// Fragment m/z values of one candidate at one fragment charge.
///
/// Both series are indexed by bond: entry `i` is the fragment that breaks between
/// residue `i` and `i + 1`. So `n_term[0]` is b1 and `c_term[0]` is y(len - 1).
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeStateIons {
    pub charge: u8,
    pub n_term: Vec<f64>,
    pub c_term: Vec<f64>,
}

impl ChargeStateIons {
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.n_term.iter().chain(self.c_term.iter()).copied()
    }
}

/// Unmodified (static and terminal modifications only) b/y ladder of a peptide.
///
/// Built once per sequence and mass type; dynamic modifications are layered on
/// top per candidate by [`TheoreticalSpectrum::charge_state_ions`].
#[derive(Debug, Clone)]
pub struct TheoreticalSpectrum {
    mass_type: MassType,
    /// Singly charged N-terminal ions (b, or c for ETD), by bond.
    n_term: Vec<f64>,
    /// Singly charged C-terminal ions (y, or z-dot for ETD), by bond.
    c_term: Vec<f64>,
    peptide_mass: f64,
}

impl TheoreticalSpectrum {
    pub fn new(
        sequence: &str,
        params: &AScoreParameters,
        mass_type: MassType,
    ) -> Result<Self, PsmError> {
        let residue_masses = sequence
            .chars()
            .map(|aa| {
                mass_type
                    .residue_mass(aa)
                    .ok_or_else(|| PsmError::UnknownResidue {
                        residue: aa,
                        sequence: sequence.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, PsmError>>()?;
        let len = residue_masses.len();
        if len == 0 {
            return Err(PsmError::InvalidSequence {
                sequence: sequence.to_string(),
                reason: "no residues".into(),
            });
        }

        let nterm_mass: f64 = params
            .terminal_mods
            .iter()
            .filter(|x| x.terminus == Terminus::N)
            .map(|x| x.mass.get(mass_type))
            .sum();
        let cterm_mass: f64 = params
            .terminal_mods
            .iter()
            .filter(|x| x.terminus == Terminus::C)
            .map(|x| x.mass.get(mass_type))
            .sum();

        let fixed_mass = |i: usize, aa: char| -> f64 {
            let mut mass = residue_masses[i];
            if i == 0 {
                mass += nterm_mass;
            }
            if i == len - 1 {
                mass += cterm_mass;
            }
            mass + params
                .static_mods
                .iter()
                .filter(|m| m.matches_residue(aa))
                .map(|m| m.mass.get(mass_type))
                .sum::<f64>()
        };

        let residues: Vec<char> = sequence.chars().collect();

        let mut running = PROTON;
        let mut n_term = Vec::with_capacity(len);
        for (i, aa) in residues.iter().enumerate() {
            running += fixed_mass(i, *aa);
            n_term.push(running);
        }
        let peptide_mass = running + mass_type.water() - PROTON;
        // Last entry is the whole peptide, not a fragment
        n_term.pop();

        let mut running = mass_type.water() + PROTON;
        let mut c_term = vec![0.0; len - 1];
        for i in (0..len).rev() {
            running += fixed_mass(i, residues[i]);
            if i > 0 {
                c_term[i - 1] = running;
            }
        }

        if params.fragmentation == FragmentationType::Etd {
            let ammonia = mass_type.ammonia();
            let nh2 = mass_type.nh2();
            n_term.iter_mut().for_each(|x| *x += ammonia);
            c_term.iter_mut().for_each(|x| *x -= nh2);
        }

        Ok(Self {
            mass_type,
            n_term,
            c_term,
            peptide_mass,
        })
    }

    pub fn sequence_len(&self) -> usize {
        self.n_term.len() + 1
    }

    /// Neutral mass of the whole peptide with static and terminal modifications.
    pub fn peptide_mass(&self) -> f64 {
        self.peptide_mass
    }

    fn dynamic_masses(
        &self,
        sites: &[ModificationId],
        registry: &ModificationRegistry,
    ) -> Result<Vec<f64>, DataProcessingError> {
        if sites.len() != self.sequence_len() {
            return Err(DataProcessingError::AssignmentLengthMismatch {
                expected: self.sequence_len(),
                other: sites.len(),
                context: "building fragment ions".into(),
            });
        }
        sites
            .iter()
            .map(|id| match id {
                0 => Ok(0.0),
                id => registry
                    .get(*id)
                    .map(|m| m.mass.get(self.mass_type))
                    .ok_or_else(|| DataProcessingError::UnknownModificationId {
                        id: *id,
                        context: "building fragment ions".into(),
                    }),
            })
            .collect()
    }

    /// Neutral peptide mass including the dynamic modifications of `sites`.
    pub fn modified_peptide_mass(
        &self,
        sites: &[ModificationId],
        registry: &ModificationRegistry,
    ) -> Result<f64, DataProcessingError> {
        Ok(self.peptide_mass + self.dynamic_masses(sites, registry)?.iter().sum::<f64>())
    }

    /// Fragment m/z values of a candidate placement at `charge`.
    pub fn charge_state_ions(
        &self,
        sites: &[ModificationId],
        registry: &ModificationRegistry,
        charge: u8,
    ) -> Result<ChargeStateIons, DataProcessingError> {
        let dynamic = self.dynamic_masses(sites, registry)?;
        let total: f64 = dynamic.iter().sum();
        let z = charge.max(1) as f64;
        let extra_protons = (z - 1.0) * PROTON;

        let mut n_term = Vec::with_capacity(self.n_term.len());
        let mut c_term = Vec::with_capacity(self.c_term.len());
        let mut prefix = 0.0;
        for (bond, (b, y)) in self.n_term.iter().zip(self.c_term.iter()).enumerate() {
            prefix += dynamic[bond];
            n_term.push((b + prefix + extra_protons) / z);
            c_term.push((y + (total - prefix) + extra_protons) / z);
        }

        Ok(ChargeStateIons {
            charge,
            n_term,
            c_term,
        })
    }
}
