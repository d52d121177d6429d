pub mod candidates;
pub mod engine;
pub mod observer;
pub mod peptide_score;
pub mod pipeline;
pub mod precursor_check;
pub mod results;

pub use candidates::CandidateScore;
pub use engine::AScoreEngine;
pub use observer::{
    IonReportObserver,
    NoopObserver,
    SiteComparison,
};
pub use peptide_score::{
    DEPTH_WEIGHTS,
    match_probability,
    peptide_score,
};
pub use pipeline::{
    BatchStats,
    PipelineOptions,
    ScoringPipeline,
};
pub use precursor_check::PrecursorCheck;
pub use results::{
    AScoreResult,
    ModificationSite,
    PsmResult,
};
