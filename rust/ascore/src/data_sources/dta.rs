//! Reader for concatenated DTA files.
//!
//! Each spectrum starts with a header line naming the original DTA file,
//! followed by an `MH+ charge` line and one `m/z intensity` line per peak:
//!
//! ```text
//! =================================== "Dataset.1234.1234.2.dta" ==================================
//! 1032.4851 2
//! 147.1128 2035.2
//! 244.1656 512.8
//! ```

use crate::errors::{
    DataReadingError,
    PsmError,
};
use crate::spectrum::{
    ExperimentalSpectrum,
    Peak,
};
use crate::traits::SpectrumSource;
use regex::Regex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{
    info,
    warn,
};

static DTA_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^=+\s*"(?P<dataset>.+)\.(?P<start>\d+)\.(?P<end>\d+)\.(?P<charge>\d+)\.dta"\s*=*\s*$"#)
        .expect("DTA header pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtaHeader {
    pub dataset: String,
    pub scan_start: u32,
    pub scan_end: u32,
    pub charge: u8,
}

impl DtaHeader {
    /// Parses a header line. `None` if the line is not a header.
    ///
    /// Example:
    /// ```
    /// use ascore::data_sources::DtaHeader;
    /// let h = DtaHeader::parse(r#"=== "My.Data.set.100.102.3.dta" ==="#).unwrap();
    /// assert_eq!(h.dataset, "My.Data.set");
    /// assert_eq!((h.scan_start, h.scan_end, h.charge), (100, 102, 3));
    /// assert!(DtaHeader::parse("100.0 5.0").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let caps = DTA_HEADER.captures(line.trim())?;
        Some(Self {
            dataset: caps["dataset"].to_string(),
            scan_start: caps["start"].parse().ok()?,
            scan_end: caps["end"].parse().ok()?,
            charge: caps["charge"].parse().ok()?,
        })
    }
}

struct PendingSpectrum {
    header: DtaHeader,
    precursor: Option<(f64, u8)>,
    peaks: Vec<Peak>,
}

/// All spectra of a concatenated DTA file, keyed by (scan, charge).
#[derive(Debug, Default)]
pub struct DtaFile {
    spectra: HashMap<(u32, u8), ExperimentalSpectrum>,
    by_scan: HashMap<u32, (u32, u8)>,
}

impl DtaFile {
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, DataReadingError> {
        let path = path.as_ref();
        info!("Reading spectra from {}", path.display());
        let file = std::fs::File::open(path).map_err(|e| DataReadingError::FileReadingError {
            source: e,
            context: "opening DTA file",
            path: path.to_path_buf(),
        })?;
        let out = Self::from_reader(BufReader::new(file))?;
        info!("Read {} spectra from {}", out.len(), path.display());
        Ok(out)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DataReadingError> {
        let mut out = Self::default();
        let mut pending: Option<PendingSpectrum> = None;

        for (i, line) in reader.lines().enumerate() {
            let line_num = i + 1;
            let line = line.map_err(|e| DataReadingError::DtaParsingError {
                line: line_num,
                msg: e.to_string(),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = DtaHeader::parse(trimmed) {
                if let Some(done) = pending.take() {
                    out.finish(done);
                }
                pending = Some(PendingSpectrum {
                    header,
                    precursor: None,
                    peaks: Vec::new(),
                });
                continue;
            }

            let Some(current) = pending.as_mut() else {
                return Err(DataReadingError::DtaParsingError {
                    line: line_num,
                    msg: "data before the first spectrum header".into(),
                });
            };
            let (a, b) = parse_pair(trimmed).ok_or_else(|| DataReadingError::DtaParsingError {
                line: line_num,
                msg: format!("expected two numbers, got '{}'", trimmed),
            })?;
            match current.precursor {
                None => current.precursor = Some((a, b.round() as u8)),
                Some(_) => current.peaks.push(Peak {
                    mz: a,
                    intensity: b,
                }),
            }
        }

        if let Some(done) = pending.take() {
            out.finish(done);
        }
        Ok(out)
    }

    fn finish(&mut self, pending: PendingSpectrum) {
        let scan = pending.header.scan_start;
        let Some((mh, precursor_charge)) = pending.precursor else {
            warn!("DTA block for scan {} has no precursor line", scan);
            return;
        };
        let charge = if precursor_charge > 0 {
            precursor_charge
        } else {
            pending.header.charge
        };
        let spectrum = match ExperimentalSpectrum::new(scan, charge, mh, pending.peaks) {
            Ok(x) => x,
            Err(PsmError::EmptySpectrum { .. }) => {
                warn!("Spectrum for scan {} (charge {}) has no peaks", scan, charge);
                return;
            }
            Err(e) => {
                warn!("Dropping spectrum for scan {}: {}", scan, e);
                return;
            }
        };

        match self.spectra.entry((scan, charge)) {
            Entry::Occupied(_) => {
                warn!("Repeated spectrum for scan {} charge {}, keeping the first", scan, charge);
            }
            Entry::Vacant(slot) => {
                slot.insert(spectrum);
                self.by_scan.entry(scan).or_insert((scan, charge));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }
}

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.split_whitespace();
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    Some((a, b))
}

impl SpectrumSource for DtaFile {
    fn get_spectrum(&self, scan: u32, charge: u8) -> Option<&ExperimentalSpectrum> {
        self.spectra
            .get(&(scan, charge))
            .or_else(|| self.by_scan.get(&scan).and_then(|key| self.spectra.get(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
=================================== "Run01.100.100.2.dta" ==================================
1032.4851 2
147.1128 2035.2
244.1656 512.8
=================================== "Run01.100.100.3.dta" ==================================
1032.4851 3
147.1128 2035.2
=================================== "Run01.205.205.2.dta" ==================================
884.3300 2
175.1190 100.0
300.2000 50.0
401.0000 10.0
=================================== "Run01.300.300.2.dta" ==================================
700.0 2
"#;

    #[test]
    fn test_reads_blocks() {
        let dta = DtaFile::from_reader(SAMPLE.as_bytes()).unwrap();
        // Scan 300 has no peaks and is dropped
        assert_eq!(dta.len(), 3);
        let s = dta.get_spectrum(205, 2).unwrap();
        assert_eq!(s.peaks().len(), 3);
        assert!((s.precursor_mh - 884.33).abs() < 1e-9);
        assert_eq!(dta.get_spectrum(100, 3).unwrap().charge, 3);
        assert!(dta.get_spectrum(300, 2).is_none());
    }

    #[test]
    fn test_falls_back_to_scan() {
        let dta = DtaFile::from_reader(SAMPLE.as_bytes()).unwrap();
        let s = dta.get_spectrum(205, 4).unwrap();
        assert_eq!(s.scan, 205);
        assert!(dta.get_spectrum(999, 2).is_none());
    }

    #[test]
    fn test_rejects_garbage() {
        let bad = "147.1 20.0\n";
        assert!(matches!(
            DtaFile::from_reader(bad.as_bytes()),
            Err(DataReadingError::DtaParsingError { line: 1, .. })
        ));
        let bad = "=== \"a.1.1.2.dta\" ===\n1000.0 2\nnot a peak\n";
        assert!(matches!(
            DtaFile::from_reader(bad.as_bytes()),
            Err(DataReadingError::DtaParsingError { line: 3, .. })
        ));
    }
}
