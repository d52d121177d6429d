use super::config::OutputConfig;
use crate::errors::CliError;
use ascore::data_sources::{
    DtaFile,
    ResultTsvWriter,
    read_psm_table,
};
use ascore::scoring::{
    BatchStats,
    PipelineOptions,
};
use ascore::{
    AScoreParameters,
    PsmRecord,
    ScoringPipeline,
    SpectrumSource,
};
use indicatif::{
    ProgressIterator,
    ProgressStyle,
};
use std::path::Path;
use std::time::Instant;
use tracing::{
    debug,
    info,
};

pub fn main_loop<S: SpectrumSource>(
    psms: &[PsmRecord],
    pipeline: &ScoringPipeline<'_, S>,
    chunk_size: usize,
    output: &OutputConfig,
) -> std::result::Result<BatchStats, CliError> {
    let mut chunk_num = 0;
    let mut totals = BatchStats::default();
    let start = Instant::now();

    let out_path = output.result_path();
    let mut writer = ResultTsvWriter::new(&out_path)?;
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| CliError::Config {
        source: e.to_string(),
    })?;

    for chunk in psms.chunks(chunk_size).progress_with_style(style) {
        // Parallelism happens inside process_batch
        let (results, stats) = pipeline.process_batch(chunk)?;
        if let Some(best) = results
            .iter()
            .max_by(|a, b| a.peptide_score.total_cmp(&b.peptide_score))
        {
            debug!("Best peptide score in chunk {}: {:#?}", chunk_num, best);
        }
        for result in results.iter() {
            writer.add(result)?;
        }
        totals += stats;
        chunk_num += 1;
    }

    let rows = writer.rows_written();
    writer.close()?;
    info!(
        "Processed {} PSMs ({} scored, {} skipped, {} duplicates, {} filtered), wrote {} rows to {}",
        totals.total,
        totals.scored,
        totals.skipped,
        totals.duplicates,
        totals.filtered,
        rows,
        out_path.display()
    );
    info!(
        "Finished processing {} chunks in {:?}",
        chunk_num,
        start.elapsed()
    );
    Ok(totals)
}

pub fn process_files(
    psm_file: &Path,
    dta_file: &Path,
    params: &AScoreParameters,
    options: PipelineOptions,
    chunk_size: usize,
    output: &OutputConfig,
) -> std::result::Result<BatchStats, CliError> {
    let st = Instant::now();
    let psms = read_psm_table(psm_file)?;
    let spectra = DtaFile::from_file(dta_file)?;
    info!(
        "Loading {} PSMs and {} spectra took {:?}",
        psms.len(),
        spectra.len(),
        st.elapsed()
    );

    let pipeline = ScoringPipeline::new(params, &spectra, options);
    main_loop(&psms, &pipeline, chunk_size, output)
}
