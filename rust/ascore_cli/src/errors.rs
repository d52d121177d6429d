#[derive(Debug)]
pub enum CliError {
    Config {
        source: String,
    },
    ParseError {
        msg: String,
    },
    Io {
        source: String,
        path: Option<String>,
    },
    DataReading {
        source: String,
    },
    Scoring {
        source: String,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config { source } => write!(f, "Error interpreting the config: {}", source),
            CliError::ParseError { msg } => write!(f, "Error parsing config: {}", msg),
            CliError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "Error reading file {}: {}", path, source)
                } else {
                    write!(f, "Error reading file: {}", source)
                }
            }
            CliError::DataReading { source } => write!(f, "Error reading data: {}", source),
            CliError::Scoring { source } => write!(f, "Error scoring PSMs: {}", source),
        }
    }
}

impl From<ascore::errors::DataReadingError> for CliError {
    fn from(e: ascore::errors::DataReadingError) -> Self {
        CliError::DataReading {
            source: format!("{:?}", e),
        }
    }
}

impl From<ascore::errors::ConfigError> for CliError {
    fn from(e: ascore::errors::ConfigError) -> Self {
        CliError::Config {
            source: e.to_string(),
        }
    }
}

impl From<ascore::errors::AScoreError> for CliError {
    fn from(e: ascore::errors::AScoreError) -> Self {
        match e {
            ascore::errors::AScoreError::Config(x) => x.into(),
            ascore::errors::AScoreError::DataReading(x) => x.into(),
            other => CliError::Scoring {
                source: other.to_string(),
            },
        }
    }
}
