mod cli;
mod config;
mod errors;
mod processing;

use ascore::AScoreParameters;
use ascore::scoring::PipelineOptions;
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Cli::parse();

    // Load and parse configuration
    let conf = match std::fs::File::open(&args.config) {
        Ok(x) => x,
        Err(e) => {
            return Err(errors::CliError::Io {
                source: e.to_string(),
                path: Some(args.config.to_string_lossy().to_string()),
            });
        }
    };
    let config: Result<Config, _> = serde_json::from_reader(conf);
    let mut config = match config {
        Ok(x) => x,
        Err(e) => {
            return Err(errors::CliError::ParseError { msg: e.to_string() });
        }
    };
    config.apply_cli_args(&args);
    let inputs = config.resolve_inputs()?;
    info!("Parsed configuration: {:#?}", config);

    let params = AScoreParameters::from_config(config.parameters.clone())?;

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| errors::CliError::Config {
                source: e.to_string(),
            })?;
        info!("Using {} threads", threads);
    }

    // Create output directory
    if let Err(e) = std::fs::create_dir_all(&inputs.output.directory) {
        return Err(errors::CliError::Io {
            source: e.to_string(),
            path: Some(inputs.output.directory.to_string_lossy().to_string()),
        });
    }

    let options = PipelineOptions {
        skip_precursor_mismatch: config.skip_precursor_mismatch,
    };
    processing::process_files(
        &inputs.psm_file,
        &inputs.dta_file,
        &params,
        options,
        config.chunk_size,
        &inputs.output,
    )?;

    Ok(())
}
