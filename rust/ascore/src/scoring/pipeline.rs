//! Batch scoring of PSMs.
//!
//! A batch goes through three stages:
//!
//! 1. **Filtering** (sequential): repeated PSMs and PSMs failing the MS-GF+
//!    pre-filter are dropped. The duplicate guard lives across batches.
//! 2. **Scoring** (parallel): every remaining PSM is scored on the rayon pool.
//!    Indexed iterators keep results in input order.
//! 3. **Error policy**: per-PSM problems are logged and the PSM is skipped;
//!    scoring invariant violations abort the batch.

use super::engine::AScoreEngine;
use super::observer::{
    IonReportObserver,
    NoopObserver,
};
use super::precursor_check::PrecursorCheck;
use super::results::PsmResult;
use crate::config::AScoreParameters;
use crate::errors::{
    AScoreError,
    PsmError,
    Result,
};
use crate::models::{
    PsmKey,
    PsmRecord,
};
use crate::traits::SpectrumSource;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{
    debug,
    error,
    info,
    warn,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Skip PSMs whose precursor mass cannot be explained by isotope offsets.
    pub skip_precursor_mismatch: bool,
}

/// Counts of what happened to the PSMs of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub duplicates: usize,
    pub filtered: usize,
    pub skipped: usize,
    pub scored: usize,
}

impl std::ops::AddAssign for BatchStats {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.duplicates += other.duplicates;
        self.filtered += other.filtered;
        self.skipped += other.skipped;
        self.scored += other.scored;
    }
}

pub struct ScoringPipeline<'a, S: SpectrumSource, O = NoopObserver> {
    engine: AScoreEngine<'a, O>,
    spectra: &'a S,
    options: PipelineOptions,
    seen: Mutex<HashSet<PsmKey>>,
}

impl<'a, S: SpectrumSource> ScoringPipeline<'a, S, NoopObserver> {
    pub fn new(params: &'a AScoreParameters, spectra: &'a S, options: PipelineOptions) -> Self {
        Self::with_engine(AScoreEngine::new(params), spectra, options)
    }
}

impl<'a, S: SpectrumSource, O: IonReportObserver> ScoringPipeline<'a, S, O> {
    pub fn with_engine(engine: AScoreEngine<'a, O>, spectra: &'a S, options: PipelineOptions) -> Self {
        Self {
            engine,
            spectra,
            options,
            seen: Mutex::new(HashSet::new()),
        }
    }

    pub fn engine(&self) -> &AScoreEngine<'a, O> {
        &self.engine
    }

    /// True the first time a (scan, charge, peptide) is seen.
    fn first_sighting(&self, psm: &PsmRecord) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        seen.insert(psm.key())
    }

    fn passes_prefilter(&self, psm: &PsmRecord) -> bool {
        match psm.spec_evalue {
            Some(x) => x <= self.engine.params().msgf_pre_threshold,
            None => true,
        }
    }

    fn score_one(&self, psm: &PsmRecord) -> Result<PsmResult> {
        let spectrum =
            self.spectra
                .get_spectrum(psm.scan, psm.charge)
                .ok_or(PsmError::SpectrumNotFound {
                    scan: psm.scan,
                    charge: psm.charge,
                })?;
        let result = self.engine.score_psm(psm, spectrum)?;
        if self.options.skip_precursor_mismatch {
            if let PrecursorCheck::Inconsistent { delta_mass } = result.precursor_check {
                return Err(PsmError::PrecursorMismatch {
                    scan: psm.scan,
                    delta_mass,
                }
                .into());
            }
        }
        Ok(result)
    }

    /// `Ok(None)` when the PSM was skipped.
    fn process_psm(&self, psm: &PsmRecord) -> Result<Option<PsmResult>> {
        match self.score_one(psm) {
            Ok(x) => Ok(Some(x)),
            Err(AScoreError::Psm(e)) => {
                warn!("Skipping scan {} ({}): {}", psm.scan, psm.peptide, e);
                Ok(None)
            }
            Err(e) => {
                error!("Scoring failed on scan {} ({}): {}", psm.scan, psm.peptide, e);
                Err(e)
            }
        }
    }

    /// Scores a batch of PSMs. Results follow input order.
    pub fn process_batch(&self, psms: &[PsmRecord]) -> Result<(Vec<PsmResult>, BatchStats)> {
        let mut stats = BatchStats {
            total: psms.len(),
            ..Default::default()
        };

        let mut to_score: Vec<&PsmRecord> = Vec::with_capacity(psms.len());
        for psm in psms {
            if !self.first_sighting(psm) {
                debug!("Duplicate PSM: scan {} {}", psm.scan, psm.peptide);
                stats.duplicates += 1;
                continue;
            }
            if !self.passes_prefilter(psm) {
                stats.filtered += 1;
                continue;
            }
            to_score.push(psm);
        }

        let results: Vec<PsmResult> = to_score
            .par_iter()
            .map(|psm| self.process_psm(psm))
            .collect::<Result<Vec<Option<PsmResult>>>>()?
            .into_iter()
            .flatten()
            .collect();

        stats.scored = results.len();
        stats.skipped = to_score.len() - results.len();
        info!(
            "Scored {} of {} PSMs ({} duplicates, {} filtered, {} skipped)",
            stats.scored, stats.total, stats.duplicates, stats.filtered, stats.skipped
        );
        Ok((results, stats))
    }
}
