//! Folk & Ward grain-size statistics.
//!
//! Converts sieve-fraction measurements (grain size in mm, weight percent)
//! into a phi-scale cumulative curve and the graphic mean, sorting, skewness
//! and kurtosis of Folk & Ward (1957). Everything here is a pure function of
//! its input; callers own loading, plotting and export.

use thiserror::Error;

use crate::processing::interpolation::interp_clamped;

/// Why a sample was rejected before any statistics were computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("at least 2 points are required, got {0}")]
    TooFewPoints(usize),

    #[error("row {row}: grain size must be a positive number, got {value}")]
    NonPositiveGrainSize { row: usize, value: f64 },

    #[error("row {row}: weight must be a non-negative number, got {value}")]
    InvalidWeight { row: usize, value: f64 },

    #[error("total weight is zero")]
    ZeroTotalWeight,

    #[error("row {row}: {message}")]
    Unparsable { row: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrainSizeError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// A percentile spread used as a divisor is zero.
    #[error("degenerate distribution: phi{low} and phi{high} are both {value:.4}")]
    DegenerateDistribution { low: u8, high: u8, value: f64 },
}

pub type GrainSizeResult<T> = Result<T, GrainSizeError>;

/// One sieve fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainSizePoint {
    pub grain_size_mm: f64,
    pub weight_percent: f64,
}

impl GrainSizePoint {
    pub fn new(grain_size_mm: f64, weight_percent: f64) -> Self {
        Self { grain_size_mm, weight_percent }
    }
}

/// Measurements of one sediment specimen, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    points: Vec<GrainSizePoint>,
}

impl Sample {
    pub fn new(points: Vec<GrainSizePoint>) -> Self {
        Self { points }
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self {
            points: pairs
                .into_iter()
                .map(|(size, weight)| GrainSizePoint::new(size, weight))
                .collect(),
        }
    }

    pub fn points(&self) -> &[GrainSizePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn grain_sizes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.grain_size_mm).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.weight_percent).collect()
    }

    /// Check every precondition of the analysis. Rows are reported 1-based.
    pub fn validate(&self) -> Result<f64, InvalidInput> {
        if self.points.len() < 2 {
            return Err(InvalidInput::TooFewPoints(self.points.len()));
        }

        for (i, p) in self.points.iter().enumerate() {
            if !p.grain_size_mm.is_finite() || p.grain_size_mm <= 0.0 {
                return Err(InvalidInput::NonPositiveGrainSize {
                    row: i + 1,
                    value: p.grain_size_mm,
                });
            }
        }

        for (i, p) in self.points.iter().enumerate() {
            if !p.weight_percent.is_finite() || p.weight_percent < 0.0 {
                return Err(InvalidInput::InvalidWeight {
                    row: i + 1,
                    value: p.weight_percent,
                });
            }
        }

        let total: f64 = self.points.iter().map(|p| p.weight_percent).sum();
        if total <= 0.0 {
            return Err(InvalidInput::ZeroTotalWeight);
        }

        Ok(total)
    }
}

/// Convert a grain size in millimetres to the phi scale.
pub fn to_phi(grain_size_mm: f64) -> f64 {
    // `+ 0.0` folds -0.0 (1 mm) into 0.0.
    -grain_size_mm.log2() + 0.0
}

/// Cumulative weight curve on the phi scale, sorted by phi ascending.
///
/// Only built by [`compute_folk_ward`], so it always holds at least two
/// points and `cumulative_percent` ends at 100 within rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct PhiDistribution {
    phi: Vec<f64>,
    weight_percent: Vec<f64>,
    cumulative_percent: Vec<f64>,
}

impl PhiDistribution {
    fn from_sample(sample: &Sample, total_weight: f64) -> Self {
        let mut pairs: Vec<(f64, f64)> = sample
            .points()
            .iter()
            .map(|p| (to_phi(p.grain_size_mm), p.weight_percent))
            .collect();

        // `sort_by` is stable: equal phi keep their input order.
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut running = 0.0;
        let mut cumulative_percent = Vec::with_capacity(pairs.len());
        for &(_, w) in &pairs {
            running += w;
            cumulative_percent.push(running / total_weight * 100.0);
        }

        Self {
            phi: pairs.iter().map(|&(phi, _)| phi).collect(),
            weight_percent: pairs.iter().map(|&(_, w)| w).collect(),
            cumulative_percent,
        }
    }

    pub fn phi(&self) -> &[f64] {
        &self.phi
    }

    /// Weights reordered to match [`Self::phi`].
    pub fn weight_percent(&self) -> &[f64] {
        &self.weight_percent
    }

    pub fn cumulative_percent(&self) -> &[f64] {
        &self.cumulative_percent
    }

    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }

    /// Phi value at cumulative percent `p`, by linear interpolation.
    ///
    /// Clamps to the first/last phi outside the observed cumulative range.
    pub fn percentile(&self, p: f64) -> f64 {
        interp_clamped(&self.cumulative_percent, &self.phi, p).unwrap_or(f64::NAN)
    }

    /// (phi, cumulative %) pairs, ready for plotting.
    pub fn curve_points(&self) -> Vec<[f64; 2]> {
        self.phi
            .iter()
            .zip(self.cumulative_percent.iter())
            .map(|(&x, &y)| [x, y])
            .collect()
    }
}

/// Percentile phi values read off the cumulative curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhiPercentiles {
    pub phi5: f64,
    pub phi16: f64,
    pub phi25: f64,
    pub phi50: f64,
    pub phi75: f64,
    pub phi84: f64,
    pub phi95: f64,
}

impl PhiPercentiles {
    fn read(distribution: &PhiDistribution) -> Self {
        Self {
            phi5: distribution.percentile(5.0),
            phi16: distribution.percentile(16.0),
            phi25: distribution.percentile(25.0),
            phi50: distribution.percentile(50.0),
            phi75: distribution.percentile(75.0),
            phi84: distribution.percentile(84.0),
            phi95: distribution.percentile(95.0),
        }
    }

    /// (level, phi) pairs in ascending level order.
    pub fn as_pairs(&self) -> [(f64, f64); 7] {
        [
            (5.0, self.phi5),
            (16.0, self.phi16),
            (25.0, self.phi25),
            (50.0, self.phi50),
            (75.0, self.phi75),
            (84.0, self.phi84),
            (95.0, self.phi95),
        ]
    }
}

/// Folk & Ward graphic measures, all in phi units except kurtosis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FolkWardStatistics {
    pub mean: f64,
    pub sorting: f64,
    pub skewness: f64,
    /// `None` when phi75 == phi25.
    pub kurtosis: Option<f64>,
    pub percentiles: PhiPercentiles,
}

impl FolkWardStatistics {
    fn from_percentiles(p: PhiPercentiles) -> GrainSizeResult<Self> {
        if p.phi84 == p.phi16 {
            return Err(GrainSizeError::DegenerateDistribution {
                low: 16,
                high: 84,
                value: p.phi16,
            });
        }
        if p.phi95 == p.phi5 {
            return Err(GrainSizeError::DegenerateDistribution {
                low: 5,
                high: 95,
                value: p.phi5,
            });
        }

        let mean = (p.phi16 + p.phi50 + p.phi84) / 3.0;
        let sorting = (p.phi84 - p.phi16) / 4.0 + (p.phi95 - p.phi5) / 6.6;
        let skewness = (p.phi16 + p.phi84 - 2.0 * p.phi50) / (2.0 * (p.phi84 - p.phi16))
            + (p.phi5 + p.phi95 - 2.0 * p.phi50) / (2.0 * (p.phi95 - p.phi5));
        let kurtosis = if p.phi75 == p.phi25 {
            None
        } else {
            Some((p.phi95 - p.phi5) / (2.44 * (p.phi75 - p.phi25)))
        };

        Ok(Self {
            mean,
            sorting,
            skewness,
            kurtosis,
            percentiles: p,
        })
    }
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct GrainSizeAnalysis {
    pub distribution: PhiDistribution,
    pub statistics: FolkWardStatistics,
}

/// Run the Folk & Ward pipeline on a sample.
///
/// Either both the cumulative curve and the statistics are returned, or an
/// error naming the failed condition.
pub fn compute_folk_ward(sample: &Sample) -> GrainSizeResult<GrainSizeAnalysis> {
    let total_weight = sample.validate()?;
    let distribution = PhiDistribution::from_sample(sample, total_weight);
    let percentiles = PhiPercentiles::read(&distribution);
    let statistics = FolkWardStatistics::from_percentiles(percentiles)?;

    Ok(GrainSizeAnalysis {
        distribution,
        statistics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn textbook_sample() -> Sample {
        Sample::from_pairs([
            (2.0, 5.0),
            (1.0, 15.0),
            (0.5, 25.0),
            (0.25, 35.0),
            (0.125, 15.0),
            (0.0625, 5.0),
        ])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn textbook_sample_curve() {
        let analysis = compute_folk_ward(&textbook_sample()).unwrap();
        let dist = &analysis.distribution;

        let expected_phi = [-1.0, 0.0, 1.0, 2.0, 3.0, 4.0];
        let expected_cum = [5.0, 20.0, 45.0, 80.0, 95.0, 100.0];
        assert_eq!(dist.len(), 6);
        for (a, e) in dist.phi().iter().zip(expected_phi) {
            assert_close(*a, e);
        }
        for (a, e) in dist.cumulative_percent().iter().zip(expected_cum) {
            assert_close(*a, e);
        }
    }

    #[test]
    fn textbook_sample_statistics() {
        let stats = compute_folk_ward(&textbook_sample()).unwrap().statistics;
        let p = stats.percentiles;

        assert_close(p.phi5, -1.0);
        assert_close(p.phi16, -1.0 + 11.0 / 15.0);
        assert_close(p.phi25, 0.2);
        assert_close(p.phi50, 1.0 + 5.0 / 35.0);
        assert_close(p.phi75, 1.0 + 30.0 / 35.0);
        assert_close(p.phi84, 2.0 + 4.0 / 15.0);
        assert_close(p.phi95, 3.0);

        let mean = (p.phi16 + p.phi50 + p.phi84) / 3.0;
        let sorting = (p.phi84 - p.phi16) / 4.0 + (p.phi95 - p.phi5) / 6.6;
        assert_close(stats.mean, mean);
        assert_close(stats.sorting, sorting);
        assert!(stats.sorting > 0.0);
        assert!(stats.skewness < 0.0);
        assert!((stats.skewness - (-0.092_11)).abs() < 1e-4);
        let kurtosis = stats.kurtosis.unwrap();
        assert!((kurtosis - 0.9893).abs() < 1e-3);
    }

    #[test]
    fn weights_are_reordered_with_phi() {
        let sample = Sample::from_pairs([(0.25, 10.0), (1.0, 30.0), (0.5, 60.0)]);
        let analysis = compute_folk_ward(&sample).unwrap();
        assert_eq!(analysis.distribution.phi(), &[0.0, 1.0, 2.0]);
        assert_eq!(analysis.distribution.weight_percent(), &[30.0, 60.0, 10.0]);
    }

    #[test]
    fn geometric_sizes_with_equal_weights_reach_100() {
        let sample = Sample::from_pairs((0..12).map(|i| (4.0 / 2f64.powi(i), 7.0)));
        let analysis = compute_folk_ward(&sample).unwrap();
        let last = *analysis.distribution.cumulative_percent().last().unwrap();
        assert!((last - 100.0).abs() < 1e-6);
    }

    #[test]
    fn cumulative_curve_is_non_decreasing() {
        let sample = Sample::from_pairs([
            (0.3, 4.0),
            (2.0, 0.0),
            (0.9, 11.0),
            (0.05, 2.5),
            (0.11, 0.0),
            (1.4, 8.0),
        ]);
        let analysis = compute_folk_ward(&sample).unwrap();
        let cum = analysis.distribution.cumulative_percent();
        assert_eq!(cum.len(), sample.len());
        assert!(cum.windows(2).all(|w| w[0] <= w[1]));
        assert!(analysis.distribution.phi().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn percentile_is_monotonic_and_clamped() {
        let analysis = compute_folk_ward(&textbook_sample()).unwrap();
        let dist = &analysis.distribution;
        let p0 = dist.percentile(0.0);
        let p50 = dist.percentile(50.0);
        let p100 = dist.percentile(100.0);
        assert!(p0 <= p50 && p50 <= p100);

        // Below the first cumulative value (5 %) the first phi is returned.
        assert_eq!(dist.percentile(1.0), -1.0);
        assert_eq!(dist.percentile(-10.0), -1.0);
        assert_eq!(dist.percentile(150.0), 4.0);
    }

    #[test]
    fn zero_weight_fraction_uses_last_phi_on_flat_run() {
        // A 1.5 mm sieve with nothing retained leaves the curve flat at 5 %.
        let mut pairs: Vec<(f64, f64)> = textbook_sample()
            .points()
            .iter()
            .map(|p| (p.grain_size_mm, p.weight_percent))
            .collect();
        pairs.push((1.5, 0.0));
        let analysis = compute_folk_ward(&Sample::from_pairs(pairs)).unwrap();

        let cum = analysis.distribution.cumulative_percent();
        assert_close(cum[0], 5.0);
        assert_close(cum[1], 5.0);

        let phi_1_5 = -(1.5f64).log2();
        let p = analysis.statistics.percentiles;
        assert_close(p.phi5, phi_1_5);
        // phi16 interpolates from the end of the flat run, not from -1.
        assert_close(p.phi16, phi_1_5 + (11.0 / 15.0) * (0.0 - phi_1_5));
        assert_close(p.phi95, 3.0);

        let sorting = (p.phi84 - p.phi16) / 4.0 + (p.phi95 - p.phi5) / 6.6;
        assert_close(analysis.statistics.sorting, sorting);
    }

    #[test]
    fn kurtosis_absent_when_quartiles_coincide() {
        let sample = Sample::from_pairs([(1.0, 20.0), (0.5, 5.0), (0.5, 55.0), (0.25, 20.0)]);
        let stats = compute_folk_ward(&sample).unwrap().statistics;

        assert_close(stats.percentiles.phi25, 1.0);
        assert_close(stats.percentiles.phi75, 1.0);
        assert_eq!(stats.kurtosis, None);
        assert!(stats.sorting.is_finite());
        assert_close(stats.sorting, 1.2 / 4.0 + 1.75 / 6.6);
        assert!(stats.skewness.is_finite());
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let sample = textbook_sample();
        let a = compute_folk_ward(&sample).unwrap();
        let b = compute_folk_ward(&sample).unwrap();
        assert_eq!(a.statistics.mean.to_bits(), b.statistics.mean.to_bits());
        assert_eq!(a.statistics.sorting.to_bits(), b.statistics.sorting.to_bits());
        assert_eq!(a.statistics.skewness.to_bits(), b.statistics.skewness.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn single_grain_size_is_degenerate() {
        let sample = Sample::from_pairs([(0.5, 10.0), (0.5, 20.0), (0.5, 30.0)]);
        let err = compute_folk_ward(&sample).unwrap_err();
        assert!(matches!(
            err,
            GrainSizeError::DegenerateDistribution { low: 16, high: 84, .. }
        ));
    }

    #[test]
    fn zero_total_weight_is_rejected() {
        let sample = Sample::from_pairs([(1.0, 0.0), (0.5, 0.0), (0.25, 0.0)]);
        assert_eq!(
            compute_folk_ward(&sample).unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::ZeroTotalWeight)
        );
    }

    #[test]
    fn non_positive_grain_size_is_rejected() {
        let zero = Sample::from_pairs([(1.0, 10.0), (0.0, 20.0)]);
        assert_eq!(
            compute_folk_ward(&zero).unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::NonPositiveGrainSize { row: 2, value: 0.0 })
        );

        let negative = Sample::from_pairs([(-0.5, 10.0), (0.5, 20.0)]);
        assert!(matches!(
            compute_folk_ward(&negative).unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::NonPositiveGrainSize { row: 1, .. })
        ));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let sample = Sample::from_pairs([(1.0, 10.0), (0.5, -2.0)]);
        assert!(matches!(
            compute_folk_ward(&sample).unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::InvalidWeight { row: 2, .. })
        ));
    }

    #[test]
    fn too_few_points_is_rejected() {
        let sample = Sample::from_pairs([(1.0, 100.0)]);
        assert_eq!(
            compute_folk_ward(&sample).unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::TooFewPoints(1))
        );
        assert_eq!(
            compute_folk_ward(&Sample::default()).unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::TooFewPoints(0))
        );
    }

    #[test]
    fn error_messages_name_the_condition() {
        let err = compute_folk_ward(&Sample::from_pairs([(1.0, 10.0), (0.0, 20.0)])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: row 2: grain size must be a positive number, got 0"
        );
    }
}
