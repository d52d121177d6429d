use crate::errors::{
    DataProcessingError,
    PsmError,
};
use crate::mass::{
    PROTON,
    mass_to_mz,
};
use tracing::debug;

pub const MAX_PEAK_DEPTH: usize = 10;
pub const WINDOW_WIDTH: f64 = 100.0;
/// Peaks closer than this to a more intense kept peak are not kept.
pub const MIN_PEAK_SEPARATION: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

/// Observed MS/MS spectrum with the depth-limited peak lists cached.
///
/// Depth `d` keeps, in each 100 Da window, the `d` most intense peaks that
/// survive sub-bin and proximity filtering. Each cached list is sorted by m/z.
#[derive(Debug, Clone)]
pub struct ExperimentalSpectrum {
    pub scan: u32,
    pub charge: u8,
    /// Singly protonated precursor mass.
    pub precursor_mh: f64,
    peaks: Vec<Peak>,
    depth_mzs: Vec<Vec<f64>>,
}

impl ExperimentalSpectrum {
    pub fn new(
        scan: u32,
        charge: u8,
        precursor_mh: f64,
        peaks: impl IntoIterator<Item = Peak>,
    ) -> Result<Self, PsmError> {
        let mut peaks: Vec<Peak> = peaks
            .into_iter()
            .filter(|p| p.mz.is_finite() && p.intensity.is_finite() && p.intensity > 0.0)
            .collect();
        if peaks.is_empty() {
            return Err(PsmError::EmptySpectrum { scan });
        }
        peaks.sort_unstable_by(|a, b| a.mz.total_cmp(&b.mz));

        let windows = select_window_peaks(&peaks);
        let depth_mzs = (1..=MAX_PEAK_DEPTH)
            .map(|depth| {
                let mut mzs: Vec<f64> = windows
                    .iter()
                    .flat_map(|w| w.iter().take(depth).map(|p| p.mz))
                    .collect();
                mzs.sort_unstable_by(|a, b| a.total_cmp(b));
                mzs
            })
            .collect();

        debug!(
            "Scan {}: {} peaks in {} windows",
            scan,
            peaks.len(),
            windows.len()
        );

        Ok(Self {
            scan,
            charge,
            precursor_mh,
            peaks,
            depth_mzs,
        })
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Precursor m/z at `charge`, which may differ from the charge the file reported.
    pub fn precursor_mz(&self, charge: u8) -> f64 {
        mass_to_mz(self.precursor_mh - PROTON, charge.max(1))
    }

    /// Peak m/z values kept at `depth` (1..=10), sorted.
    pub fn peak_depth_spectrum(&self, depth: usize) -> Result<&[f64], DataProcessingError> {
        if depth == 0 || depth > MAX_PEAK_DEPTH {
            return Err(DataProcessingError::InvalidPeakDepth { depth });
        }
        Ok(&self.depth_mzs[depth - 1])
    }
}

/// Per 100 Da window, the kept peaks ordered by descending intensity.
///
/// `peaks` must be sorted by m/z.
fn select_window_peaks(peaks: &[Peak]) -> Vec<Vec<Peak>> {
    let Some(first) = peaks.first() else {
        return Vec::new();
    };
    let min_mz = first.mz;

    let mut windows: Vec<Vec<Peak>> = Vec::new();
    let mut start = 0;
    while start < peaks.len() {
        let window_idx = ((peaks[start].mz - min_mz) / WINDOW_WIDTH).floor();
        let end = start
            + peaks[start..]
                .partition_point(|p| ((p.mz - min_mz) / WINDOW_WIDTH).floor() <= window_idx);

        // Most intense peak per 1 Da sub-bin
        let mut binned: Vec<Peak> = Vec::new();
        let mut last_bin = f64::NAN;
        for peak in peaks[start..end].iter() {
            let bin = (peak.mz - min_mz).floor();
            match binned.last_mut() {
                Some(best) if bin == last_bin => {
                    if peak.intensity > best.intensity {
                        *best = *peak;
                    }
                }
                _ => binned.push(*peak),
            }
            last_bin = bin;
        }

        binned.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        let mut kept: Vec<Peak> = Vec::with_capacity(MAX_PEAK_DEPTH);
        for peak in binned {
            if kept.len() == MAX_PEAK_DEPTH {
                break;
            }
            if kept
                .iter()
                .all(|k| (k.mz - peak.mz).abs() >= MIN_PEAK_SEPARATION)
            {
                kept.push(peak);
            }
        }
        windows.push(kept);
        start = end;
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(mz: f64, intensity: f64) -> Peak {
        Peak { mz, intensity }
    }

    #[test]
    fn test_one_peak_per_sub_bin() {
        let spec = ExperimentalSpectrum::new(
            1,
            2,
            1000.0,
            vec![peak(100.1, 5.0), peak(100.5, 10.0), peak(101.2, 1.0)],
        )
        .unwrap();
        assert_eq!(spec.peak_depth_spectrum(1).unwrap(), &[100.5]);
        assert_eq!(spec.peak_depth_spectrum(10).unwrap(), &[100.5, 101.2]);
    }

    #[test]
    fn test_close_peaks_are_suppressed() {
        // 101.8 and 102.1 sit in different sub-bins but only 0.3 Da apart
        let spec = ExperimentalSpectrum::new(
            1,
            2,
            1000.0,
            vec![peak(100.0, 10.0), peak(101.8, 5.0), peak(102.1, 3.0)],
        )
        .unwrap();
        assert_eq!(spec.peak_depth_spectrum(10).unwrap(), &[100.0, 101.8]);
    }

    #[test]
    fn test_depth_limits_each_window() {
        let mut peaks = Vec::new();
        for window in 0..3 {
            for i in 0..15 {
                peaks.push(peak(
                    200.0 + window as f64 * 100.0 + i as f64 * 5.0,
                    (i + 1) as f64,
                ));
            }
        }
        let spec = ExperimentalSpectrum::new(1, 2, 1000.0, peaks).unwrap();
        for depth in 1..=MAX_PEAK_DEPTH {
            assert_eq!(spec.peak_depth_spectrum(depth).unwrap().len(), 3 * depth);
        }
        let top = spec.peak_depth_spectrum(1).unwrap();
        assert_eq!(top, &[270.0, 370.0, 470.0]);
    }

    #[test]
    fn test_invalid_depth_and_empty_spectrum() {
        let spec = ExperimentalSpectrum::new(1, 2, 1000.0, vec![peak(150.0, 1.0)]).unwrap();
        assert!(spec.peak_depth_spectrum(0).is_err());
        assert!(spec.peak_depth_spectrum(11).is_err());

        let out = ExperimentalSpectrum::new(
            7,
            2,
            1000.0,
            vec![peak(150.0, 0.0), peak(f64::NAN, 3.0)],
        );
        assert!(matches!(out, Err(PsmError::EmptySpectrum { scan: 7 })));
    }

    #[test]
    fn test_precursor_mz() {
        let spec = ExperimentalSpectrum::new(1, 2, 1001.0, vec![peak(150.0, 1.0)]).unwrap();
        assert!((spec.precursor_mz(2) - (1001.0 + PROTON) / 2.0).abs() < 1e-9);
        assert!((spec.precursor_mz(3) - (1001.0 + 2.0 * PROTON) / 3.0).abs() < 1e-9);
        assert!((spec.precursor_mz(0) - 1001.0).abs() < 1e-9);
    }
}
