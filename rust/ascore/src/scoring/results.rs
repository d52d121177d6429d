use super::precursor_check::PrecursorCheck;
use crate::models::ModificationId;
use serde::Serialize;

/// AScore reported when no candidate can replace the winner at a site.
pub const UNAMBIGUOUS_ASCORE: f64 = 1000.0;
/// AScore reported for a PSM that carries no dynamic modification.
pub const NO_SITE_ASCORE: f64 = -1.0;

/// A modified residue of the winning placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModificationSite {
    pub residue: char,
    /// 1-based position in the clean sequence.
    pub position: usize,
    pub modification_id: ModificationId,
    pub label: String,
}

impl std::fmt::Display for ModificationSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.residue, self.position, self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AScoreResult {
    pub site: ModificationSite,
    pub ascore: f64,
    /// Site-determining ions of the winner at the chosen depth.
    pub possible_ions: usize,
    pub matched_ions: usize,
    /// Peak depth used for the comparison, `None` without a runner-up.
    pub depth: Option<usize>,
    pub runner_up_sequence: Option<String>,
    pub runner_up_sites: Option<Vec<ModificationId>>,
}

impl AScoreResult {
    pub fn unambiguous(site: ModificationSite) -> Self {
        Self {
            site,
            ascore: UNAMBIGUOUS_ASCORE,
            possible_ions: 0,
            matched_ions: 0,
            depth: None,
            runner_up_sequence: None,
            runner_up_sites: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PsmResult {
    pub scan: u32,
    pub charge: u8,
    pub input_sequence: String,
    pub best_sequence: String,
    pub best_sites: Vec<ModificationId>,
    pub peptide_score: f64,
    pub num_candidates: usize,
    /// 1-based rank of the placement the search engine reported, if it was a candidate.
    pub reported_rank: Option<usize>,
    pub precursor_check: PrecursorCheck,
    pub site_scores: Vec<AScoreResult>,
}
