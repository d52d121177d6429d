use std::path::PathBuf;

/// Problems with the parameter set. These are reported before any PSM is scored.
#[derive(Debug)]
pub enum ConfigError {
    MissingField {
        field: &'static str,
        context: String,
    },
    InvalidModification {
        index: usize,
        reason: String,
    },
    DuplicateSymbol {
        symbol: char,
    },
    InvalidLabel {
        label: String,
    },
    InvalidTolerance {
        value: f64,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' ({})", field, context)
            }
            ConfigError::InvalidModification { index, reason } => {
                write!(f, "Invalid modification #{}: {}", index, reason)
            }
            ConfigError::DuplicateSymbol { symbol } => {
                write!(f, "Modification symbol '{}' is used more than once", symbol)
            }
            ConfigError::InvalidLabel { label } => write!(
                f,
                "Modification label '{}' must be non-empty and contain no uppercase letters",
                label
            ),
            ConfigError::InvalidTolerance { value } => write!(
                f,
                "Fragment mass tolerance must be a positive finite number, got {}",
                value
            ),
        }
    }
}

/// Anomalies tied to a single PSM. The PSM is skipped and the run continues.
#[derive(Debug)]
pub enum PsmError {
    InvalidSequence {
        sequence: String,
        reason: String,
    },
    UnknownResidue {
        residue: char,
        sequence: String,
    },
    SpectrumNotFound {
        scan: u32,
        charge: u8,
    },
    EmptySpectrum {
        scan: u32,
    },
    NoValidCandidates {
        sequence: String,
    },
    PrecursorMismatch {
        scan: u32,
        delta_mass: f64,
    },
}

impl std::fmt::Display for PsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PsmError::InvalidSequence { sequence, reason } => {
                write!(f, "Invalid peptide sequence {}: {}", sequence, reason)
            }
            PsmError::UnknownResidue { residue, sequence } => {
                write!(f, "Unknown residue '{}' in {}", residue, sequence)
            }
            PsmError::SpectrumNotFound { scan, charge } => {
                write!(f, "No spectrum found for scan {} (charge {})", scan, charge)
            }
            PsmError::EmptySpectrum { scan } => write!(f, "Spectrum for scan {} has no peaks", scan),
            PsmError::NoValidCandidates { sequence } => write!(
                f,
                "No valid modification placement exists for {}",
                sequence
            ),
            PsmError::PrecursorMismatch { scan, delta_mass } => write!(
                f,
                "Precursor mass of scan {} differs from the theoretical mass by {:.4} Da",
                scan, delta_mass
            ),
        }
    }
}

/// Broken invariants inside the scoring engine. These abort the run.
#[derive(Debug)]
pub enum DataProcessingError {
    InvalidPeakDepth {
        depth: usize,
    },
    AssignmentLengthMismatch {
        expected: usize,
        other: usize,
        context: String,
    },
    UnknownModificationId {
        id: u32,
        context: String,
    },
    ExpectedNonEmptyData {
        context: Option<String>,
    },
}

impl DataProcessingError {
    pub fn append_to_context(mut self, context: &str) -> Self {
        match &mut self {
            DataProcessingError::InvalidPeakDepth { .. } => {}
            DataProcessingError::AssignmentLengthMismatch {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::UnknownModificationId {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::ExpectedNonEmptyData {
                context: owned_context,
            } => match owned_context {
                Some(x) => x.push_str(context),
                None => *owned_context = Some(context.to_string()),
            },
        }
        self
    }
}

#[derive(Debug)]
pub enum DataReadingError {
    FileReadingError {
        source: std::io::Error,
        context: &'static str,
        path: PathBuf,
    },
    TableError {
        source: csv::Error,
        path: Option<PathBuf>,
    },
    DtaParsingError {
        line: usize,
        msg: String,
    },
}

#[derive(Debug)]
pub enum AScoreError {
    Config(ConfigError),
    Psm(PsmError),
    DataProcessing(DataProcessingError),
    DataReading(DataReadingError),
}

impl AScoreError {
    /// Per-PSM problems can be logged and skipped, everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AScoreError::Psm(_))
    }
}

impl std::fmt::Display for AScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AScoreError::Config(x) => write!(f, "Configuration error: {}", x),
            AScoreError::Psm(x) => write!(f, "{}", x),
            AScoreError::DataProcessing(x) => write!(f, "Scoring error: {:?}", x),
            AScoreError::DataReading(x) => write!(f, "Error reading data: {:?}", x),
        }
    }
}

impl std::error::Error for AScoreError {}

pub type Result<T> = std::result::Result<T, AScoreError>;

impl From<ConfigError> for AScoreError {
    fn from(x: ConfigError) -> Self {
        Self::Config(x)
    }
}

impl From<PsmError> for AScoreError {
    fn from(x: PsmError) -> Self {
        Self::Psm(x)
    }
}

impl From<DataProcessingError> for AScoreError {
    fn from(x: DataProcessingError) -> Self {
        Self::DataProcessing(x)
    }
}

impl From<DataReadingError> for AScoreError {
    fn from(x: DataReadingError) -> Self {
        Self::DataReading(x)
    }
}

impl From<csv::Error> for AScoreError {
    fn from(x: csv::Error) -> Self {
        Self::DataReading(DataReadingError::TableError {
            source: x,
            path: None,
        })
    }
}
