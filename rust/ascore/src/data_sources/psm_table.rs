use crate::errors::DataReadingError;
use crate::models::PsmRecord;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Reads a tab-delimited PSM table with `Scan`, `Charge`, `Peptide` and an
/// optional `SpecEValue` column. Other columns are ignored.
pub fn read_psm_table<T: AsRef<Path>>(path: T) -> Result<Vec<PsmRecord>, DataReadingError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DataReadingError::FileReadingError {
        source: e,
        context: "opening PSM table",
        path: path.to_path_buf(),
    })?;
    let out = read_psm_records(file).map_err(|e| match e {
        DataReadingError::TableError { source, .. } => DataReadingError::TableError {
            source,
            path: Some(path.to_path_buf()),
        },
        other => other,
    })?;
    info!("Read {} PSMs from {}", out.len(), path.display());
    Ok(out)
}

pub fn read_psm_records<R: Read>(reader: R) -> Result<Vec<PsmRecord>, DataReadingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);
    rdr.deserialize()
        .map(|row| row.map_err(|e| DataReadingError::TableError { source: e, path: None }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_with_optional_evalue() {
        let text = "Scan\tCharge\tPeptide\tSpecEValue\tProtein\n\
                    10\t2\tK.PEPT*IDE.R\t1e-12\tsp|P1\n\
                    11\t3\tAS*TPEPTIDE\t\tsp|P2\n";
        let rows = read_psm_records(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scan, 10);
        assert_eq!(rows[0].peptide, "K.PEPT*IDE.R");
        assert_eq!(rows[0].spec_evalue, Some(1e-12));
        assert_eq!(rows[1].charge, 3);
        assert_eq!(rows[1].spec_evalue, None);
    }

    #[test]
    fn test_accepts_msgf_column_name() {
        let text = "Scan\tCharge\tPeptide\tMSGF_SpecProb\n5\t2\tPEPS*IDE\t0.5\n";
        let rows = read_psm_records(text.as_bytes()).unwrap();
        assert_eq!(rows[0].spec_evalue, Some(0.5));
    }

    #[test]
    fn test_bad_row_is_an_error() {
        let text = "Scan\tCharge\tPeptide\nabc\t2\tPEPTIDE\n";
        assert!(matches!(
            read_psm_records(text.as_bytes()),
            Err(DataReadingError::TableError { .. })
        ));
    }
}
