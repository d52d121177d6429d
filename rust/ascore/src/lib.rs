pub mod combinations;
pub mod config;
pub mod data_sources;
pub mod errors;
pub mod fragment_mass;
pub mod mass;
pub mod models;
pub mod scoring;
pub mod spectrum;
pub mod traits;
pub mod utils;

pub use config::{
    AScoreParameters,
    FragmentationType,
    ParameterConfig,
};
pub use models::{
    ParsedPeptide,
    PsmRecord,
};
pub use scoring::{
    AScoreEngine,
    PsmResult,
    ScoringPipeline,
};
pub use spectrum::ExperimentalSpectrum;
pub use traits::SpectrumSource;
