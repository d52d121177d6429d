//! Enumeration of modification placements.
//!
//! Every dynamic modification has a list of candidate sites. A placement picks
//! `count` of them for each modification (copies of the same modification are
//! interchangeable, so these are subsets, not permutations) such that no
//! position is claimed twice.
//!
//! The product across modifications is expanded depth first and a branch is
//! abandoned as soon as it would reuse an occupied position, so colliding
//! combinations are never built.

use crate::models::{
    ModificationId,
    ModificationOccurrence,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCombinations {
    /// One array per candidate, `0` = unmodified, otherwise the modification id.
    pub assignments: Vec<Vec<ModificationId>>,
    /// Every position that is a candidate site for any modification, sorted.
    pub all_sites: Vec<usize>,
}

impl SiteCombinations {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

struct Expansion<'a> {
    ids: Vec<ModificationId>,
    counts: Vec<usize>,
    site_lists: Vec<Vec<usize>>,
    current: Vec<ModificationId>,
    out: &'a mut Vec<Vec<ModificationId>>,
}

impl Expansion<'_> {
    fn expand(&mut self, mod_idx: usize) {
        if mod_idx == self.ids.len() {
            self.out.push(self.current.clone());
            return;
        }
        self.place(mod_idx, 0, self.counts[mod_idx]);
    }

    /// Chooses `remaining` more sites for modification `mod_idx`, in increasing
    /// order starting at `start` in its site list.
    fn place(&mut self, mod_idx: usize, start: usize, remaining: usize) {
        if remaining == 0 {
            self.expand(mod_idx + 1);
            return;
        }

        let num_sites = self.site_lists[mod_idx].len();
        let mut j = start;
        while j < num_sites && num_sites - j >= remaining {
            let pos = self.site_lists[mod_idx][j];
            if self.current[pos] == 0 {
                self.current[pos] = self.ids[mod_idx];
                self.place(mod_idx, j + 1, remaining - 1);
                self.current[pos] = 0;
            }
            j += 1;
        }
    }
}

/// Enumerates all collision-free placements of the given modifications.
///
/// Example:
/// ```
/// use ascore::combinations::generate_site_combinations;
/// use ascore::models::{DynamicModification, ModMass, ModificationOccurrence};
/// let phospho = DynamicModification {
///     id: 1,
///     symbol: '*',
///     label: "*".into(),
///     mass: ModMass::new(79.966331, None),
///     residues: vec!['S', 'T'],
///     n_terminal: false,
///     c_terminal: false,
/// };
/// let occ = [ModificationOccurrence { modification: &phospho, count: 2 }];
/// let combos = generate_site_combinations(&occ, "AASTS");
/// assert_eq!(combos.assignments.len(), 3);
/// assert_eq!(combos.all_sites, vec![2, 3, 4]);
/// assert_eq!(combos.assignments[0], vec![0, 0, 1, 1, 0]);
/// ```
pub fn generate_site_combinations(
    occurrences: &[ModificationOccurrence<'_>],
    sequence: &str,
) -> SiteCombinations {
    let site_lists: Vec<Vec<usize>> = occurrences
        .iter()
        .map(|occ| occ.modification.candidate_sites(sequence))
        .collect();

    let mut all_sites: Vec<usize> = site_lists.iter().flatten().copied().collect();
    all_sites.sort_unstable();
    all_sites.dedup();

    let mut assignments = Vec::new();
    let mut expansion = Expansion {
        ids: occurrences.iter().map(|x| x.modification.id).collect(),
        counts: occurrences.iter().map(|x| x.count).collect(),
        site_lists,
        current: vec![0; sequence.len()],
        out: &mut assignments,
    };
    expansion.expand(0);

    SiteCombinations {
        assignments,
        all_sites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DynamicModification,
        ModMass,
    };

    fn dynamic_mod(id: ModificationId, residues: &str) -> DynamicModification {
        DynamicModification {
            id,
            symbol: ['*', '#', '@'][id as usize - 1],
            label: "*".into(),
            mass: ModMass::new(79.966331, None),
            residues: residues.chars().collect(),
            n_terminal: false,
            c_terminal: false,
        }
    }

    #[test]
    fn test_two_copies_over_three_sites() {
        let phospho = dynamic_mod(1, "ST");
        let occ = [ModificationOccurrence {
            modification: &phospho,
            count: 2,
        }];
        let combos = generate_site_combinations(&occ, "AASTS");
        assert_eq!(
            combos.assignments,
            vec![
                vec![0, 0, 1, 1, 0],
                vec![0, 0, 1, 0, 1],
                vec![0, 0, 0, 1, 1],
            ]
        );
    }

    #[test]
    fn test_overlapping_modifications_never_collide() {
        let a = dynamic_mod(1, "ST");
        let b = dynamic_mod(2, "S");
        let occ = [
            ModificationOccurrence {
                modification: &a,
                count: 1,
            },
            ModificationOccurrence {
                modification: &b,
                count: 1,
            },
        ];
        let combos = generate_site_combinations(&occ, "SST");
        // b on 0 -> a on 1 or 2; b on 1 -> a on 0 or 2
        assert_eq!(combos.len(), 4);
        for assignment in combos.assignments.iter() {
            assert_eq!(assignment.iter().filter(|x| **x == 1).count(), 1);
            assert_eq!(assignment.iter().filter(|x| **x == 2).count(), 1);
        }
        assert_eq!(combos.all_sites, vec![0, 1, 2]);
    }

    #[test]
    fn test_too_many_copies_yields_nothing() {
        let phospho = dynamic_mod(1, "S");
        let occ = [ModificationOccurrence {
            modification: &phospho,
            count: 2,
        }];
        let combos = generate_site_combinations(&occ, "PEPSIDE");
        assert!(combos.is_empty());
        assert_eq!(combos.all_sites, vec![3]);
    }

    #[test]
    fn test_no_modifications_is_one_unmodified_candidate() {
        let combos = generate_site_combinations(&[], "PEPTIDE");
        assert_eq!(combos.assignments, vec![vec![0; 7]]);
        assert!(combos.all_sites.is_empty());
    }
}
