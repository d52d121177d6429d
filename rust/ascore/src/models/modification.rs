use crate::mass::MassType;
use serde::Serialize;

/// Identifier of a dynamic modification inside a site-assignment array.
///
/// `0` is reserved for "unmodified", so real ids start at 1.
pub type ModificationId = u32;

/// A pair of masses, one per [`MassType`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModMass {
    pub monoisotopic: f64,
    pub average: f64,
}

impl ModMass {
    pub fn new(monoisotopic: f64, average: Option<f64>) -> Self {
        Self {
            monoisotopic,
            average: average.unwrap_or(monoisotopic),
        }
    }

    pub fn get(&self, mass_type: MassType) -> f64 {
        match mass_type {
            MassType::Monoisotopic => self.monoisotopic,
            MassType::Average => self.average,
        }
    }
}

/// A modification whose position in the peptide has to be localized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicModification {
    pub id: ModificationId,
    /// Character used by the search engine in the input sequence (`*`, `#`, ...).
    pub symbol: char,
    /// Text written after the residue when rendering a localized sequence.
    pub label: String,
    pub mass: ModMass,
    pub residues: Vec<char>,
    pub n_terminal: bool,
    pub c_terminal: bool,
}

impl DynamicModification {
    pub fn matches_residue(&self, residue: char) -> bool {
        self.residues.contains(&residue)
    }

    /// Positions of `sequence` where this modification could sit.
    ///
    /// Example:
    /// ```
    /// use ascore::models::{DynamicModification, ModMass};
    /// let phospho = DynamicModification {
    ///     id: 1,
    ///     symbol: '*',
    ///     label: "*".into(),
    ///     mass: ModMass::new(79.966331, None),
    ///     residues: vec!['S', 'T', 'Y'],
    ///     n_terminal: false,
    ///     c_terminal: false,
    /// };
    /// assert_eq!(phospho.candidate_sites("ASTPEPTIDE"), vec![1, 2, 6]);
    /// ```
    pub fn candidate_sites(&self, sequence: &str) -> Vec<usize> {
        let len = sequence.len();
        if len == 0 {
            return Vec::new();
        }
        let residue_ok = |pos: usize| {
            self.residues.is_empty() || self.matches_residue(sequence.as_bytes()[pos] as char)
        };

        if self.n_terminal {
            return if residue_ok(0) { vec![0] } else { Vec::new() };
        }
        if self.c_terminal {
            return if residue_ok(len - 1) {
                vec![len - 1]
            } else {
                Vec::new()
            };
        }

        sequence
            .char_indices()
            .filter(|(_, aa)| self.matches_residue(*aa))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Always-present modification applied to every matching residue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticModification {
    pub mass: ModMass,
    pub residues: Vec<char>,
}

impl StaticModification {
    pub fn matches_residue(&self, residue: char) -> bool {
        self.residues.contains(&residue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Terminus {
    N,
    C,
}

/// Fixed modification of the peptide N- or C-terminus (e.g. TMT on the N-terminus).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminalModification {
    pub mass: ModMass,
    pub terminus: Terminus,
}

/// Lookup of dynamic modifications by id.
///
/// Labels are arbitrary strings, so there is no limit on the number of
/// simultaneous modification types.
#[derive(Debug, Clone, Default)]
pub struct ModificationRegistry {
    modifications: Vec<DynamicModification>,
}

impl ModificationRegistry {
    /// Ids are assigned in order, starting at 1.
    pub fn new(modifications: Vec<DynamicModification>) -> Self {
        debug_assert!(modifications
            .iter()
            .enumerate()
            .all(|(i, m)| m.id as usize == i + 1));
        Self { modifications }
    }

    pub fn get(&self, id: ModificationId) -> Option<&DynamicModification> {
        if id == 0 {
            return None;
        }
        self.modifications.get(id as usize - 1)
    }

    pub fn by_symbol(&self, symbol: char) -> Option<&DynamicModification> {
        self.modifications.iter().find(|m| m.symbol == symbol)
    }

    pub fn label(&self, id: ModificationId) -> Option<&str> {
        self.get(id).map(|m| m.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicModification> {
        self.modifications.iter()
    }

    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }
}
