use super::modification::{
    DynamicModification,
    ModificationId,
    ModificationRegistry,
};
use crate::errors::{
    DataProcessingError,
    PsmError,
};
use crate::mass::MassType;

/// How many copies of one dynamic modification a peptide carries.
#[derive(Debug, Clone, Copy)]
pub struct ModificationOccurrence<'a> {
    pub modification: &'a DynamicModification,
    pub count: usize,
}

/// A search-engine sequence split into flanking residues, the bare residues and
/// the number of dynamic modifications it carries.
///
/// Example:
/// ```
/// use ascore::models::{DynamicModification, ModMass, ModificationRegistry, ParsedPeptide};
/// let registry = ModificationRegistry::new(vec![DynamicModification {
///     id: 1,
///     symbol: '*',
///     label: "*".into(),
///     mass: ModMass::new(79.966331, None),
///     residues: vec!['S', 'T', 'Y'],
///     n_terminal: false,
///     c_terminal: false,
/// }]);
/// let pep = ParsedPeptide::parse("K.AS*TPEPT*IDE.R", &registry).unwrap();
/// assert_eq!(pep.clean_sequence, "ASTPEPTIDE");
/// assert_eq!(pep.prefix, Some('K'));
/// assert_eq!(pep.suffix, Some('R'));
/// assert_eq!(pep.mod_counts, vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPeptide {
    pub prefix: Option<char>,
    pub suffix: Option<char>,
    pub clean_sequence: String,
    /// Occurrence count per dynamic modification, indexed by `id - 1`.
    pub mod_counts: Vec<usize>,
    /// Placement reported by the search engine.
    pub reported_sites: Vec<ModificationId>,
}

fn split_flanks(sequence: &str) -> (Option<char>, &str, Option<char>) {
    let bytes = sequence.as_bytes();
    let len = bytes.len();
    if len >= 5 && bytes[1] == b'.' && bytes[len - 2] == b'.' {
        (
            Some(bytes[0] as char),
            &sequence[2..len - 2],
            Some(bytes[len - 1] as char),
        )
    } else {
        (None, sequence, None)
    }
}

impl ParsedPeptide {
    pub fn parse(sequence: &str, registry: &ModificationRegistry) -> Result<Self, PsmError> {
        let sequence = sequence.trim();
        if !sequence.is_ascii() {
            return Err(PsmError::InvalidSequence {
                sequence: sequence.to_string(),
                reason: "non-ASCII characters".into(),
            });
        }
        let (prefix, core, suffix) = split_flanks(sequence);

        let mut clean_sequence = String::with_capacity(core.len());
        let mut mod_counts = vec![0usize; registry.len()];
        let mut reported_sites: Vec<ModificationId> = Vec::with_capacity(core.len());
        let mut pending_nterm: Option<ModificationId> = None;

        for c in core.chars() {
            if c.is_ascii_uppercase() {
                if MassType::Monoisotopic.residue_mass(c).is_none() {
                    return Err(PsmError::UnknownResidue {
                        residue: c,
                        sequence: sequence.to_string(),
                    });
                }
                clean_sequence.push(c);
                reported_sites.push(pending_nterm.take().unwrap_or(0));
                continue;
            }

            let Some(modification) = registry.by_symbol(c) else {
                return Err(PsmError::InvalidSequence {
                    sequence: sequence.to_string(),
                    reason: format!("unknown modification symbol '{}'", c),
                });
            };
            mod_counts[modification.id as usize - 1] += 1;
            match reported_sites.last_mut() {
                Some(last) => *last = modification.id,
                // Symbol before the first residue, it belongs to position 0
                None => pending_nterm = Some(modification.id),
            }
        }

        if clean_sequence.is_empty() {
            return Err(PsmError::InvalidSequence {
                sequence: sequence.to_string(),
                reason: "no residues".into(),
            });
        }

        Ok(Self {
            prefix,
            suffix,
            clean_sequence,
            mod_counts,
            reported_sites,
        })
    }

    pub fn len(&self) -> usize {
        self.clean_sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clean_sequence.is_empty()
    }

    /// Modifications present at least once, in registry order.
    pub fn occurrences<'a>(
        &self,
        registry: &'a ModificationRegistry,
    ) -> Vec<ModificationOccurrence<'a>> {
        registry
            .iter()
            .zip(self.mod_counts.iter())
            .filter(|(_, count)| **count > 0)
            .map(|(modification, count)| ModificationOccurrence {
                modification,
                count: *count,
            })
            .collect()
    }

    /// Renders the peptide with a given site assignment, flanks included.
    pub fn render(
        &self,
        sites: &[ModificationId],
        registry: &ModificationRegistry,
    ) -> Result<String, DataProcessingError> {
        let core = render_sequence(&self.clean_sequence, sites, registry)?;
        Ok(match (self.prefix, self.suffix) {
            (Some(p), Some(s)) => format!("{}.{}.{}", p, core, s),
            _ => core,
        })
    }
}

/// Writes each residue followed by the label of the modification assigned to it.
pub fn render_sequence(
    clean_sequence: &str,
    sites: &[ModificationId],
    registry: &ModificationRegistry,
) -> Result<String, DataProcessingError> {
    if sites.len() != clean_sequence.len() {
        return Err(DataProcessingError::AssignmentLengthMismatch {
            expected: clean_sequence.len(),
            other: sites.len(),
            context: format!("rendering {}", clean_sequence),
        });
    }

    let mut out = String::with_capacity(clean_sequence.len() * 2);
    for (aa, id) in clean_sequence.chars().zip(sites.iter()) {
        out.push(aa);
        if *id != 0 {
            let label = registry
                .label(*id)
                .ok_or_else(|| DataProcessingError::UnknownModificationId {
                    id: *id,
                    context: format!("rendering {}", clean_sequence),
                })?;
            out.push_str(label);
        }
    }
    Ok(out)
}

/// Removes flanking residues and modification labels from a rendered sequence.
pub fn strip_modifications(sequence: &str) -> String {
    let (_, core, _) = split_flanks(sequence);
    core.chars().filter(|c| c.is_ascii_uppercase()).collect()
}
