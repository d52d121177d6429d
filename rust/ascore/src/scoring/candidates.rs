use super::peptide_score::{
    DEPTH_WEIGHTS,
    match_probability,
    peptide_score,
};
use crate::errors::DataProcessingError;
use crate::models::ModificationId;
use crate::spectrum::{
    ExperimentalSpectrum,
    MAX_PEAK_DEPTH,
    count_matches,
};

/// Scores of one site placement against every peak depth.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Position in generation order.
    pub index: usize,
    pub sites: Vec<ModificationId>,
    /// Theoretical fragment m/z values, sorted.
    pub ions: Vec<f64>,
    pub matched: [usize; MAX_PEAK_DEPTH],
    pub depth_scores: [f64; MAX_PEAK_DEPTH],
    pub weighted_score: f64,
}

impl CandidateScore {
    pub fn score(
        index: usize,
        sites: Vec<ModificationId>,
        ions: Vec<f64>,
        spectrum: &ExperimentalSpectrum,
        tolerance: f64,
    ) -> Result<Self, DataProcessingError> {
        let mut matched = [0; MAX_PEAK_DEPTH];
        let mut depth_scores = [0.0; MAX_PEAK_DEPTH];
        let mut weighted_score = 0.0;
        for depth in 1..=MAX_PEAK_DEPTH {
            let peaks = spectrum.peak_depth_spectrum(depth)?;
            let n_matched = count_matches(&ions, peaks, tolerance);
            let score = peptide_score(match_probability(depth, tolerance), ions.len(), n_matched);
            matched[depth - 1] = n_matched;
            depth_scores[depth - 1] = score;
            weighted_score += DEPTH_WEIGHTS[depth - 1] * score;
        }

        Ok(Self {
            index,
            sites,
            ions,
            matched,
            depth_scores,
            weighted_score,
        })
    }

    /// Depth (1-based) where this candidate beats `other` the most.
    ///
    /// Ties go to the lowest depth; depth 1 when it never scores higher.
    pub fn best_separating_depth(&self, other: &CandidateScore) -> usize {
        let mut best_depth = 1;
        let mut best_diff = 0.0;
        for (i, (a, b)) in self
            .depth_scores
            .iter()
            .zip(other.depth_scores.iter())
            .enumerate()
        {
            let diff = a - b;
            if diff > best_diff {
                best_diff = diff;
                best_depth = i + 1;
            }
        }
        best_depth
    }
}

/// Candidate indices by descending weighted score. Ties keep generation order.
pub fn rank_candidates(candidates: &[CandidateScore]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|a, b| {
        candidates[*b]
            .weighted_score
            .total_cmp(&candidates[*a].weighted_score)
    });
    order
}

/// First ranked candidate that differs from `winner` at `position` and agrees
/// with it at every other modified position of the winner.
pub fn find_runner_up<'a>(
    ranked: &[usize],
    candidates: &'a [CandidateScore],
    winner: &CandidateScore,
    position: usize,
) -> Option<&'a CandidateScore> {
    let other_sites: Vec<usize> = winner
        .sites
        .iter()
        .enumerate()
        .filter(|(i, id)| **id != 0 && *i != position)
        .map(|(i, _)| i)
        .collect();

    ranked.iter().map(|i| &candidates[*i]).find(|c| {
        c.sites[position] != winner.sites[position]
            && other_sites.iter().all(|i| c.sites[*i] == winner.sites[*i])
    })
}
