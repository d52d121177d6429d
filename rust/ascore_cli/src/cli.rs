use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the tab-delimited PSM table (will over-write the config file)
    #[arg(short, long)]
    pub psm_file: Option<PathBuf>,

    /// Path to the concatenated DTA file (will over-write the config file)
    #[arg(short, long)]
    pub dta_file: Option<PathBuf>,

    /// Path to the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of worker threads (defaults to all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Skip PSMs whose precursor mass does not match the peptide
    #[arg(long)]
    pub skip_precursor_mismatch: bool,
}
