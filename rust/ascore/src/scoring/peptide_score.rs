use crate::spectrum::MAX_PEAK_DEPTH;
use crate::utils::math::{
    ln_choose,
    log_sum_exp,
};

/// Weight of each peak depth (1..=10) in the candidate ranking score.
pub const DEPTH_WEIGHTS: [f64; MAX_PEAK_DEPTH] = [0.5, 0.75, 1.0, 1.0, 1.0, 1.0, 0.75, 0.5, 0.25, 0.25];

/// Probability of a random match for one ion at a given peak depth.
///
/// `depth` peaks per 100 Da, each covering `2 * tolerance` Da.
pub fn match_probability(depth: usize, tolerance: f64) -> f64 {
    depth as f64 * tolerance * 2.0 / 100.0
}

/// `-10 * log10(P(X >= matched))` with `X ~ Binomial(possible, probability)`.
///
/// Always finite and non-negative.
///
/// Example:
/// ```
/// use ascore::scoring::peptide_score;
/// assert_eq!(peptide_score(0.1, 5, 0), 0.0);
/// let one = peptide_score(0.1, 1, 1);
/// assert!((one - 10.0).abs() < 1e-9);
/// ```
pub fn peptide_score(probability: f64, possible: usize, matched: usize) -> f64 {
    let matched = matched.min(possible);
    if matched == 0 || probability >= 1.0 {
        return 0.0;
    }
    if probability.is_nan() {
        return 0.0;
    }

    let ln_p = probability.ln();
    let ln_q = (1.0 - probability).ln();
    let terms: Vec<f64> = (matched..=possible)
        .map(|i| {
            let mut term = ln_choose(possible, i);
            if i > 0 {
                term += i as f64 * ln_p;
            }
            if possible > i {
                term += (possible - i) as f64 * ln_q;
            }
            term
        })
        .collect();

    let ln_sum = log_sum_exp(&terms).clamp(f64::MIN_POSITIVE.ln(), 0.0);
    let score = -10.0 * ln_sum / std::f64::consts::LN_10;
    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_computed_tail() {
        // P(X >= 2), n = 3, p = 0.5 -> 0.5
        let score = peptide_score(0.5, 3, 2);
        assert!((score - (-10.0 * 0.5f64.log10())).abs() < 1e-9);

        // P(X >= 1), n = 2, p = 0.1 -> 0.19
        let score = peptide_score(0.1, 2, 1);
        assert!((score - (-10.0 * 0.19f64.log10())).abs() < 1e-9);
    }

    #[test]
    fn test_guards() {
        assert_eq!(peptide_score(1.0, 10, 5), 0.0);
        assert_eq!(peptide_score(1.5, 10, 5), 0.0);
        assert_eq!(peptide_score(0.0, 10, 0), 0.0);
        assert_eq!(peptide_score(0.1, 0, 0), 0.0);
        // matched is clamped to possible
        assert_eq!(peptide_score(0.1, 3, 7), peptide_score(0.1, 3, 3));
        let zero_p = peptide_score(0.0, 10, 3);
        assert!(zero_p.is_finite());
        assert!(zero_p > 0.0);
    }

    #[test]
    fn test_more_matches_score_higher() {
        let p = match_probability(4, 0.5);
        let mut last = -1.0;
        for matched in 0..=20 {
            let score = peptide_score(p, 20, matched);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_large_ion_counts_stay_finite() {
        let score = peptide_score(0.001, 3000, 2500);
        assert!(score.is_finite());
        assert!(score > 1000.0);
    }

    #[test]
    fn test_match_probability() {
        assert!((match_probability(1, 0.5) - 0.01).abs() < 1e-12);
        assert!((match_probability(10, 0.05) - 0.01).abs() < 1e-12);
    }
}
