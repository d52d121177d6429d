use crate::errors::DataReadingError;
use crate::scoring::results::{
    NO_SITE_ASCORE,
    PsmResult,
};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

/// One output row: a PSM and one of its modified sites.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow<'a> {
    #[serde(rename = "Scan")]
    pub scan: u32,
    #[serde(rename = "Charge")]
    pub charge: u8,
    #[serde(rename = "PeptideInput")]
    pub input_sequence: &'a str,
    #[serde(rename = "BestSequence")]
    pub best_sequence: &'a str,
    #[serde(rename = "PeptideScore")]
    pub peptide_score: f64,
    #[serde(rename = "PrecursorCheck")]
    pub precursor_check: &'static str,
    #[serde(rename = "PrecursorDeltaMass")]
    pub precursor_delta_mass: f64,
    #[serde(rename = "ModInfo")]
    pub mod_info: String,
    #[serde(rename = "AScore")]
    pub ascore: f64,
    #[serde(rename = "NumSiteIons")]
    pub possible_ions: usize,
    #[serde(rename = "SiteDetermineMatched")]
    pub matched_ions: usize,
    #[serde(rename = "SecondSequence")]
    pub runner_up_sequence: Option<&'a str>,
}

/// Flattens a PSM result into its rows. PSMs without modified sites get one row
/// with an AScore of -1.
pub fn result_rows(result: &PsmResult) -> Vec<ResultRow<'_>> {
    let base = ResultRow {
        scan: result.scan,
        charge: result.charge,
        input_sequence: &result.input_sequence,
        best_sequence: &result.best_sequence,
        peptide_score: result.peptide_score,
        precursor_check: result.precursor_check.label(),
        precursor_delta_mass: result.precursor_check.delta_mass(),
        mod_info: "-".into(),
        ascore: NO_SITE_ASCORE,
        possible_ions: 0,
        matched_ions: 0,
        runner_up_sequence: None,
    };
    if result.site_scores.is_empty() {
        return vec![base];
    }
    result
        .site_scores
        .iter()
        .map(|site| ResultRow {
            mod_info: site.site.to_string(),
            ascore: site.ascore,
            possible_ions: site.possible_ions,
            matched_ions: site.matched_ions,
            runner_up_sequence: site.runner_up_sequence.as_deref(),
            ..base.clone()
        })
        .collect()
}

/// Tab-delimited writer for scoring results.
pub struct ResultTsvWriter<W: Write> {
    writer: csv::Writer<W>,
    path: Option<PathBuf>,
    rows_written: usize,
}

impl ResultTsvWriter<File> {
    pub fn new<T: AsRef<Path>>(path: T) -> Result<Self, DataReadingError> {
        let path = path.as_ref();
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(path)
            .map_err(|e| DataReadingError::TableError {
                source: e,
                path: Some(path.to_path_buf()),
            })?;
        Ok(Self {
            writer,
            path: Some(path.to_path_buf()),
            rows_written: 0,
        })
    }
}

impl<W: Write> ResultTsvWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer),
            path: None,
            rows_written: 0,
        }
    }

    fn table_error(&self, e: csv::Error) -> DataReadingError {
        DataReadingError::TableError {
            source: e,
            path: self.path.clone(),
        }
    }

    pub fn add(&mut self, result: &PsmResult) -> Result<(), DataReadingError> {
        for row in result_rows(result) {
            self.writer.serialize(row).map_err(|e| self.table_error(e))?;
            self.rows_written += 1;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn close(mut self) -> Result<W, DataReadingError> {
        self.writer
            .flush()
            .map_err(|e| self.table_error(csv::Error::from(e)))?;
        if let Some(path) = &self.path {
            info!("Wrote {} rows to {}", self.rows_written, path.display());
        }
        let path = self.path.clone();
        self.writer
            .into_inner()
            .map_err(|e| DataReadingError::TableError {
                source: csv::Error::from(e.into_error()),
                path,
            })
    }
}
