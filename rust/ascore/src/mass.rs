use rustyms::molecular_formula;
use rustyms::prelude::{
    MolecularFormula,
    Peptidoform,
};
use rustyms::spectrum::MassMode;
use serde::{
    Deserialize,
    Serialize,
};
use std::sync::LazyLock;

pub const PROTON: f64 = 1.007276466812;

/// Mass difference between consecutive isotopic peaks of a peptide (13C - 12C).
pub const ISOTOPE_SPACING: f64 = 1.00335;

/// One-letter codes with a residue mass.
const RESIDUE_CODES: &str = "ACDEFGHIKLMNOPQRSTUVWY";

#[derive(Debug, Clone, Copy, PartialEq)]
struct MassPair {
    monoisotopic: f64,
    average: f64,
}

impl MassPair {
    fn of(formula: &MolecularFormula) -> Self {
        Self {
            monoisotopic: formula.mass(MassMode::Monoisotopic).value,
            average: formula.mass(MassMode::Average).value,
        }
    }

    fn get(&self, mass_type: MassType) -> f64 {
        match mass_type {
            MassType::Monoisotopic => self.monoisotopic,
            MassType::Average => self.average,
        }
    }
}

#[derive(Debug)]
struct ChemistryTable {
    water: MassPair,
    ammonia: MassPair,
    nh2: MassPair,
    residues: [Option<MassPair>; 26],
}

static CHEMISTRY: LazyLock<ChemistryTable> = LazyLock::new(ChemistryTable::build);

impl ChemistryTable {
    fn build() -> Self {
        let water = MassPair::of(&molecular_formula!(H 2 O 1));
        let mut residues = [None; 26];
        for code in RESIDUE_CODES.chars() {
            residues[(code as u8 - b'A') as usize] = residue_from_peptide(code, water);
        }
        Self {
            water,
            ammonia: MassPair::of(&molecular_formula!(N 1 H 3)),
            nh2: MassPair::of(&molecular_formula!(N 1 H 2)),
            residues,
        }
    }

    fn residue(&self, code: char) -> Option<MassPair> {
        if !code.is_ascii_uppercase() {
            return None;
        }
        self.residues[(code as u8 - b'A') as usize]
    }
}

/// A single-residue peptide is the residue plus one water.
fn residue_from_peptide(code: char, water: MassPair) -> Option<MassPair> {
    let peptide = Peptidoform::pro_forma(&code.to_string(), None).ok()?;
    let formulas = peptide.as_linear()?.formulas();
    if formulas.len() != 1 {
        return None;
    }
    let full = MassPair::of(&formulas[0]);
    Some(MassPair {
        monoisotopic: full.monoisotopic - water.monoisotopic,
        average: full.average - water.average,
    })
}

/// Which of the two mass columns a calculation reads.
///
/// This is always passed explicitly, nothing in the crate keeps a "current" mass type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MassType {
    #[default]
    Monoisotopic,
    Average,
}

impl MassType {
    pub fn water(&self) -> f64 {
        CHEMISTRY.water.get(*self)
    }

    pub fn ammonia(&self) -> f64 {
        CHEMISTRY.ammonia.get(*self)
    }

    pub fn nh2(&self) -> f64 {
        CHEMISTRY.nh2.get(*self)
    }

    /// Residue mass (not the free amino acid) of a one-letter code.
    ///
    /// Example:
    /// ```
    /// use ascore::mass::MassType;
    /// let serine = MassType::Monoisotopic.residue_mass('S').unwrap();
    /// assert!((serine - 87.03203).abs() < 1e-4);
    /// assert!(MassType::Average.residue_mass('*').is_none());
    /// ```
    pub fn residue_mass(&self, residue: char) -> Option<f64> {
        CHEMISTRY.residue(residue).map(|x| x.get(*self))
    }
}

pub fn mz_to_mass(mz: f64, charge: u8) -> f64 {
    let z = charge as f64;
    mz * z - z * PROTON
}

pub fn mass_to_mz(mass: f64, charge: u8) -> f64 {
    let z = charge as f64;
    (mass + z * PROTON) / z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_residues_have_masses() {
        for aa in RESIDUE_CODES.chars() {
            let mono = MassType::Monoisotopic.residue_mass(aa).unwrap();
            let avg = MassType::Average.residue_mass(aa).unwrap();
            assert!(mono > 50.0);
            assert!((mono - avg).abs() < 1.0, "{aa}: {mono} vs {avg}");
        }
        for code in ['B', 'J', 'X', 'Z', 's', '*'] {
            assert!(MassType::Monoisotopic.residue_mass(code).is_none(), "{code}");
        }
    }

    #[test]
    fn test_reference_masses() {
        let mono = MassType::Monoisotopic;
        let avg = MassType::Average;
        assert!((mono.water() - 18.010565).abs() < 1e-5);
        assert!((avg.water() - 18.0153).abs() < 2e-3);
        assert!((mono.ammonia() - 17.026549).abs() < 1e-5);
        assert!((mono.nh2() - 16.018724).abs() < 1e-5);
        assert!((mono.residue_mass('G').unwrap() - 57.021464).abs() < 1e-5);
        assert!((mono.residue_mass('K').unwrap() - 128.094963).abs() < 1e-5);
        assert!((avg.residue_mass('S').unwrap() - 87.077).abs() < 2e-3);
        assert_eq!(mono.residue_mass('I'), mono.residue_mass('L'));
    }

    #[test]
    fn test_mz_conversions() {
        let mass = 1000.0;
        let mz = mass_to_mz(mass, 2);
        assert!((mz - 501.007276).abs() < 1e-5);
        assert!((mz_to_mass(mz, 2) - mass).abs() < 1e-9);
    }
}
