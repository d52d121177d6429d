use super::candidates::CandidateScore;

/// Ion sets and match counts used to score one site against its runner-up.
#[derive(Debug, Clone)]
pub struct SiteComparison<'a> {
    /// 0-based position in the clean sequence.
    pub position: usize,
    pub depth: usize,
    pub winner_ions: &'a [f64],
    pub runner_up_ions: &'a [f64],
    pub winner_matched: usize,
    pub runner_up_matched: usize,
    pub ascore: f64,
}

/// Hook to inspect intermediate scoring state, e.g. to export ion reports.
///
/// Called from rayon workers, so implementations must be thread safe.
pub trait IonReportObserver: Send + Sync {
    fn on_candidate(&self, _scan: u32, _candidate: &CandidateScore) {}
    fn on_site_comparison(&self, _scan: u32, _comparison: &SiteComparison<'_>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IonReportObserver for NoopObserver {}
