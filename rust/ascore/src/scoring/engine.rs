use super::candidates::{
    CandidateScore,
    find_runner_up,
    rank_candidates,
};
use super::observer::{
    IonReportObserver,
    NoopObserver,
    SiteComparison,
};
use super::peptide_score::{
    match_probability,
    peptide_score,
};
use super::precursor_check::PrecursorCheck;
use super::results::{
    AScoreResult,
    ModificationSite,
    PsmResult,
};
use crate::combinations::generate_site_combinations;
use crate::config::AScoreParameters;
use crate::errors::{
    AScoreError,
    DataProcessingError,
    PsmError,
    Result,
};
use crate::fragment_mass::{
    FragmentMassBuilder,
    MzRange,
};
use crate::models::{
    ParsedPeptide,
    PsmRecord,
};
use crate::spectrum::{
    ExperimentalSpectrum,
    count_matches,
    site_determining_ions,
};
use tracing::{
    debug,
    warn,
};

/// Localizes the dynamic modifications of single PSMs.
///
/// The engine holds no per-PSM state and can be shared between threads.
#[derive(Debug)]
pub struct AScoreEngine<'a, O = NoopObserver> {
    params: &'a AScoreParameters,
    observer: O,
}

impl<'a> AScoreEngine<'a, NoopObserver> {
    pub fn new(params: &'a AScoreParameters) -> Self {
        Self {
            params,
            observer: NoopObserver,
        }
    }
}

impl<'a, O: IonReportObserver> AScoreEngine<'a, O> {
    pub fn with_observer(params: &'a AScoreParameters, observer: O) -> Self {
        Self { params, observer }
    }

    pub fn params(&self) -> &AScoreParameters {
        self.params
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn score_psm(&self, psm: &PsmRecord, spectrum: &ExperimentalSpectrum) -> Result<PsmResult> {
        self.score_psm_inner(psm, spectrum).map_err(|e| match e {
            AScoreError::DataProcessing(x) => {
                x.append_to_context(&format!(" (scan {})", psm.scan)).into()
            }
            other => other,
        })
    }

    fn score_psm_inner(
        &self,
        psm: &PsmRecord,
        spectrum: &ExperimentalSpectrum,
    ) -> Result<PsmResult> {
        let registry = &self.params.dynamic_mods;
        let tolerance = self.params.fragment_mass_tolerance;
        let peptide = ParsedPeptide::parse(&psm.peptide, registry)?;
        let charge = psm.charge.max(2);

        let precursor_mz = spectrum.precursor_mz(charge);
        let mz_range = MzRange::for_fragmentation(
            self.params.fragmentation,
            precursor_mz,
            spectrum.precursor_mh,
        );
        let builder = FragmentMassBuilder::new(&peptide.clean_sequence, self.params, charge, mz_range)?;

        let occurrences = peptide.occurrences(registry);
        let combinations = generate_site_combinations(&occurrences, &peptide.clean_sequence);
        if combinations.is_empty() {
            return Err(PsmError::NoValidCandidates {
                sequence: psm.peptide.clone(),
            }
            .into());
        }

        let precursor_check = PrecursorCheck::evaluate(
            builder.peptide_mass(&combinations.assignments[0])?,
            spectrum.precursor_mh,
            charge,
        );
        match precursor_check {
            PrecursorCheck::Consistent { .. } => {}
            PrecursorCheck::Inconsistent { delta_mass } => warn!(
                "Scan {}: precursor mass of {} is off by {:.4} Da",
                psm.scan, psm.peptide, delta_mass
            ),
            PrecursorCheck::LargeMismatch { delta_mass } => warn!(
                "Scan {}: large precursor mass mismatch for {} ({:.4} Da)",
                psm.scan, psm.peptide, delta_mass
            ),
        }

        let candidates = combinations
            .assignments
            .into_iter()
            .enumerate()
            .map(|(i, sites)| {
                let ions = builder.ion_mzs(&sites)?;
                let candidate = CandidateScore::score(i, sites, ions, spectrum, tolerance)?;
                self.observer.on_candidate(psm.scan, &candidate);
                Ok(candidate)
            })
            .collect::<std::result::Result<Vec<_>, DataProcessingError>>()?;

        let ranked = rank_candidates(&candidates);
        let winner = ranked
            .first()
            .map(|i| &candidates[*i])
            .ok_or(DataProcessingError::ExpectedNonEmptyData {
                context: Some("ranked candidates".into()),
            })?;
        let reported_rank = ranked
            .iter()
            .position(|i| candidates[*i].sites == peptide.reported_sites)
            .map(|rank| rank + 1);
        debug!(
            "Scan {}: {} candidates, best weighted score {:.3}, reported placement ranked {:?}",
            psm.scan,
            candidates.len(),
            winner.weighted_score,
            reported_rank
        );

        let residues = peptide.clean_sequence.as_bytes();
        let mut site_scores = Vec::new();
        for (position, id) in winner.sites.iter().enumerate() {
            if *id == 0 {
                continue;
            }
            let site = ModificationSite {
                residue: residues[position] as char,
                position: position + 1,
                modification_id: *id,
                label: registry
                    .label(*id)
                    .ok_or_else(|| DataProcessingError::UnknownModificationId {
                        id: *id,
                        context: "reporting site".into(),
                    })?
                    .to_string(),
            };

            let Some(runner_up) = find_runner_up(&ranked, &candidates, winner, position) else {
                site_scores.push(AScoreResult::unambiguous(site));
                continue;
            };

            let depth = winner.best_separating_depth(runner_up);
            let peaks = spectrum.peak_depth_spectrum(depth)?;
            let winner_ions = site_determining_ions(&winner.ions, &runner_up.ions);
            let runner_up_ions = site_determining_ions(&runner_up.ions, &winner.ions);
            let winner_matched = count_matches(&winner_ions, peaks, tolerance);
            let runner_up_matched = count_matches(&runner_up_ions, peaks, tolerance);

            let probability = match_probability(depth, tolerance);
            let ascore = (peptide_score(probability, winner_ions.len(), winner_matched)
                - peptide_score(probability, runner_up_ions.len(), runner_up_matched))
            .abs();

            self.observer.on_site_comparison(
                psm.scan,
                &SiteComparison {
                    position,
                    depth,
                    winner_ions: &winner_ions,
                    runner_up_ions: &runner_up_ions,
                    winner_matched,
                    runner_up_matched,
                    ascore,
                },
            );

            site_scores.push(AScoreResult {
                site,
                ascore,
                possible_ions: winner_ions.len(),
                matched_ions: winner_matched,
                depth: Some(depth),
                runner_up_sequence: Some(peptide.render(&runner_up.sites, registry)?),
                runner_up_sites: Some(runner_up.sites.clone()),
            });
        }

        Ok(PsmResult {
            scan: psm.scan,
            charge: psm.charge,
            input_sequence: psm.peptide.clone(),
            best_sequence: peptide.render(&winner.sites, registry)?,
            best_sites: winner.sites.clone(),
            peptide_score: winner.weighted_score,
            num_candidates: candidates.len(),
            reported_rank,
            precursor_check,
            site_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterConfig;
    use crate::spectrum::Peak;
    use std::sync::Mutex;

    fn params() -> AScoreParameters {
        let config: ParameterConfig = serde_json::from_str(
            r#"{
                "fragmentation": "HCD",
                "fragment_mass_tolerance": 0.5,
                "dynamic_modifications": [
                    {"symbol": "*", "mono_mass": 79.966331, "residues": "STY"}
                ]
            }"#,
        )
        .unwrap();
        AScoreParameters::from_config(config).unwrap()
    }

    fn flat_spectrum(mh: f64) -> ExperimentalSpectrum {
        let peaks = (0..200).map(|i| Peak {
            mz: 100.0 + i as f64 * 7.3,
            intensity: 1.0 + (i % 7) as f64,
        });
        ExperimentalSpectrum::new(1, 2, mh, peaks).unwrap()
    }

    #[test]
    fn test_single_site_is_unambiguous() {
        let p = params();
        let engine = AScoreEngine::new(&p);
        let psm = PsmRecord::new(1, 2, "K.PEPS*IDEK.R");
        let result = engine.score_psm(&psm, &flat_spectrum(1000.0)).unwrap();
        assert_eq!(result.num_candidates, 1);
        assert_eq!(result.site_scores.len(), 1);
        let site = &result.site_scores[0];
        assert_eq!(site.ascore, 1000.0);
        assert_eq!(site.possible_ions, 0);
        assert_eq!(site.matched_ions, 0);
        assert!(site.runner_up_sequence.is_none());
        assert_eq!(site.site.to_string(), "S4*");
        assert_eq!(result.best_sequence, "K.PEPS*IDEK.R");
        assert_eq!(result.reported_rank, Some(1));
    }

    #[test]
    fn test_unmodified_peptide_has_no_sites() {
        let p = params();
        let engine = AScoreEngine::new(&p);
        let psm = PsmRecord::new(1, 2, "PEPTIDEK");
        let result = engine.score_psm(&psm, &flat_spectrum(1000.0)).unwrap();
        assert!(result.site_scores.is_empty());
        assert_eq!(result.best_sequence, "PEPTIDEK");
    }

    #[test]
    fn test_psm_errors_are_recoverable() {
        let p = params();
        let engine = AScoreEngine::new(&p);
        let spectrum = flat_spectrum(1000.0);

        let all_sites_taken = PsmRecord::new(1, 2, "PEPS*S*S*IDE");
        let result = engine.score_psm(&all_sites_taken, &spectrum).unwrap();
        assert_eq!(result.num_candidates, 1);
        assert!(result.site_scores.iter().all(|x| x.ascore == 1000.0));

        let no_site = engine
            .score_psm(&PsmRecord::new(1, 2, "PEPK*"), &spectrum)
            .unwrap_err();
        assert!(no_site.is_recoverable());

        let bad_residue = engine
            .score_psm(&PsmRecord::new(1, 2, "PEPZK"), &spectrum)
            .unwrap_err();
        assert!(bad_residue.is_recoverable());
    }

    #[derive(Default)]
    struct Counting {
        candidates: Mutex<usize>,
        comparisons: Mutex<usize>,
    }

    impl IonReportObserver for Counting {
        fn on_candidate(&self, _scan: u32, _candidate: &CandidateScore) {
            *self.candidates.lock().unwrap() += 1;
        }
        fn on_site_comparison(&self, _scan: u32, comparison: &SiteComparison<'_>) {
            assert!((1..=10).contains(&comparison.depth));
            *self.comparisons.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_observer_sees_every_candidate() {
        let p = params();
        let engine = AScoreEngine::with_observer(&p, Counting::default());
        let psm = PsmRecord::new(1, 2, "AS*TPEPTIDE");
        let result = engine.score_psm(&psm, &flat_spectrum(1000.0)).unwrap();
        assert_eq!(result.num_candidates, 3);
        assert!(result.reported_rank.is_some_and(|r| (1..=3).contains(&r)));
        assert_eq!(*engine.observer().candidates.lock().unwrap(), 3);
        assert_eq!(*engine.observer().comparisons.lock().unwrap(), 1);
    }
}
