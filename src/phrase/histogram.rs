//! Pitch histograms and their comparison

use serde::{Deserialize, Serialize};

use crate::encoding::EncodedPitch;

/// Number of bins; one per encoded value in `0..BINS`
pub const BINS: usize = 499;

/// Occurrence count of each encoded pitch value
///
/// Bins cover `[0, 499]` with unit width. As with numpy's histogram the
/// last bin is closed, so a value of exactly 499 is counted in bin 498.
/// Values outside the range are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchHistogram {
    counts: Vec<u32>,
    total: u64,
}

impl PitchHistogram {
    pub fn from_pitches(pitches: &[EncodedPitch]) -> Self {
        let mut counts = vec![0u32; BINS];
        let mut total = 0u64;
        for pitch in pitches {
            let value = pitch.value();
            let bin = match value {
                v if v < 0 => continue,
                v if (v as usize) < BINS => v as usize,
                v if v as usize == BINS => BINS - 1,
                _ => continue,
            };
            counts[bin] += 1;
            total += 1;
        }
        Self { counts, total }
    }

    /// Count in one bin (0 for out-of-range bins)
    pub fn count(&self, bin: usize) -> u32 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Number of pitches that landed in a bin
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Bhattacharyya coefficient `Σ sqrt(p_i q_i)` of the normalized histograms
    ///
    /// Computed as `Σ sqrt(h1_i h2_i) / sqrt(N1 N2)` so identical histograms
    /// give exactly 1.0 and the result does not depend on argument order.
    /// `None` when either histogram is empty.
    pub fn bhattacharyya_coefficient(&self, other: &PitchHistogram) -> Option<f64> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let overlap: f64 = self
            .counts
            .iter()
            .zip(&other.counts)
            .filter(|(a, b)| **a > 0 && **b > 0)
            .map(|(a, b)| (*a as f64 * *b as f64).sqrt())
            .sum();
        let norm = (self.total as f64 * other.total as f64).sqrt();
        Some(overlap / norm)
    }
}

/// How histogram overlap is turned into a similarity in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramMetric {
    /// `1 - D_B` with `D_B = -ln(BC)`, clamped to `[0, 1]`
    #[default]
    Bhattacharyya,
    /// `1 - sqrt(1 - BC)`, the form OpenCV reports as its Bhattacharyya distance
    Hellinger,
}

impl HistogramMetric {
    /// Similarity of two histograms; 1.0 for identical distributions,
    /// 0.0 when either is empty or they do not overlap
    pub fn similarity(&self, a: &PitchHistogram, b: &PitchHistogram) -> f64 {
        let Some(bc) = a.bhattacharyya_coefficient(b) else {
            return 0.0;
        };
        match self {
            HistogramMetric::Bhattacharyya => {
                if bc <= 0.0 {
                    return 0.0;
                }
                (1.0 + bc.ln()).clamp(0.0, 1.0)
            }
            HistogramMetric::Hellinger => 1.0 - (1.0 - bc).max(0.0).sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(values: &[i32]) -> PitchHistogram {
        let pitches: Vec<EncodedPitch> = values.iter().map(|v| EncodedPitch::from_raw(*v)).collect();
        PitchHistogram::from_pitches(&pitches)
    }

    #[test]
    fn test_counts_and_range() {
        let h = hist(&[162, 162, 168, -5, 499, 600]);
        assert_eq!(h.count(162), 2);
        assert_eq!(h.count(168), 1);
        assert_eq!(h.count(498), 1);
        assert_eq!(h.total(), 4);
    }

    #[test]
    fn test_identical_histograms() {
        let a = hist(&[162, 168, 174, 179, 162]);
        assert_eq!(a.bhattacharyya_coefficient(&a), Some(1.0));
        assert_eq!(HistogramMetric::Bhattacharyya.similarity(&a, &a), 1.0);
        assert_eq!(HistogramMetric::Hellinger.similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_disjoint_histograms() {
        let a = hist(&[162, 168]);
        let b = hist(&[174, 179]);
        assert_eq!(a.bhattacharyya_coefficient(&b), Some(0.0));
        assert_eq!(HistogramMetric::Bhattacharyya.similarity(&a, &b), 0.0);
        assert_eq!(HistogramMetric::Hellinger.similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // p = (1/2, 1/2, 0), q = (1/2, 0, 1/2): BC = 1/2
        let a = hist(&[162, 168]);
        let b = hist(&[162, 174]);
        let bc = a.bhattacharyya_coefficient(&b).unwrap();
        assert!((bc - 0.5).abs() < 1e-12);

        let bhattacharyya = HistogramMetric::Bhattacharyya.similarity(&a, &b);
        assert!((bhattacharyya - (1.0 + 0.5f64.ln())).abs() < 1e-12);

        let hellinger = HistogramMetric::Hellinger.similarity(&a, &b);
        assert!((hellinger - (1.0 - 0.5f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_low_overlap_clamps_to_zero() {
        // BC = 1/4 → -ln(1/4) > 1
        let a = hist(&[162, 168, 174, 179]);
        let b = hist(&[162, 185, 191, 197]);
        assert_eq!(HistogramMetric::Bhattacharyya.similarity(&a, &b), 0.0);
        assert!(HistogramMetric::Hellinger.similarity(&a, &b) > 0.0);
    }

    #[test]
    fn test_empty_histogram() {
        let a = hist(&[]);
        let b = hist(&[162]);
        assert_eq!(a.bhattacharyya_coefficient(&b), None);
        assert_eq!(HistogramMetric::Bhattacharyya.similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_metric_names() {
        let metric: HistogramMetric = serde_yaml::from_str("hellinger").unwrap();
        assert_eq!(metric, HistogramMetric::Hellinger);
    }
}
