use ascore::ParameterConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::errors::CliError;

fn default_chunk_size() -> usize {
    5_000
}

fn default_file_name() -> String {
    "ascore_results.tsv".into()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    pub parameters: ParameterConfig,
    pub output: Option<OutputConfig>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub skip_precursor_mismatch: bool,
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct InputConfig {
    pub psm_file: Option<PathBuf>,
    pub dta_file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl OutputConfig {
    pub fn result_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Everything needed to run, after merging the config file and the command line.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub psm_file: PathBuf,
    pub dta_file: PathBuf,
    pub output: OutputConfig,
}

impl Config {
    /// Command line values take precedence over the config file.
    pub fn apply_cli_args(&mut self, args: &Cli) {
        if let Some(psm_file) = &args.psm_file {
            self.input.psm_file = Some(psm_file.clone());
        }
        if let Some(dta_file) = &args.dta_file {
            self.input.dta_file = Some(dta_file.clone());
        }
        if let Some(output_dir) = &args.output_dir {
            let file_name = self
                .output
                .as_ref()
                .map(|x| x.file_name.clone())
                .unwrap_or_else(default_file_name);
            self.output = Some(OutputConfig {
                directory: output_dir.clone(),
                file_name,
            });
        }
        if args.threads.is_some() {
            self.threads = args.threads;
        }
        if args.skip_precursor_mismatch {
            self.skip_precursor_mismatch = true;
        }
    }

    pub fn resolve_inputs(&self) -> Result<ResolvedInputs, CliError> {
        let psm_file = self.input.psm_file.clone().ok_or_else(|| CliError::Config {
            source: "No PSM file provided, please provide one in either the config file or with the --psm-file flag".to_string(),
        })?;
        let dta_file = self.input.dta_file.clone().ok_or_else(|| CliError::Config {
            source: "No DTA file provided, please provide one in either the config file or with the --dta-file flag".to_string(),
        })?;
        let output = self.output.clone().ok_or_else(|| CliError::Config {
            source: "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
        })?;
        if self.chunk_size == 0 {
            return Err(CliError::Config {
                source: "chunk_size must be positive".to_string(),
            });
        }
        Ok(ResolvedInputs {
            psm_file,
            dta_file,
            output,
        })
    }
}
