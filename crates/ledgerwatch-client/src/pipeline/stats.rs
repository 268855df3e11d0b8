use serde::{Deserialize, Serialize};

/// Consistency constant that puts the MAD on the same scale as a normal
/// standard deviation.
const MAD_NORMAL_SCALE: f64 = 1.4826;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub center: f64,
    pub spread: f64,
}

impl Distribution {
    pub const DEGENERATE: Self = Self {
        center: 0.0,
        spread: 0.0,
    };

    /// Keeps threshold arithmetic NaN-free: a non-finite center collapses to
    /// the degenerate distribution, a spread wider than `f64` can hold
    /// saturates at `f64::MAX`.
    fn guarded(center: f64, spread: f64) -> Self {
        if !center.is_finite() {
            return Self::DEGENERATE;
        }
        let spread = if spread.is_nan() || spread <= 0.0 {
            0.0
        } else {
            spread.min(f64::MAX)
        };
        Self { center, spread }
    }
}

pub trait DistributionEstimator {
    fn kind(&self) -> EstimatorKind;

    fn estimate(&self, values: &[f64]) -> Distribution;
}

/// Arithmetic mean and sample standard deviation over every value, outliers
/// included.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanStdDev;

impl DistributionEstimator for MeanStdDev {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::MeanStd
    }

    fn estimate(&self, values: &[f64]) -> Distribution {
        let finite = values
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .collect::<Vec<f64>>();
        let scale = finite.iter().fold(0.0_f64, |widest, value| widest.max(value.abs()));
        if finite.is_empty() || scale == 0.0 {
            return Distribution::DEGENERATE;
        }

        // Welford over values scaled into [-1, 1]; neither the running mean
        // nor the squared deviations can overflow there.
        let mut mean = 0.0_f64;
        let mut squared = 0.0_f64;
        for (seen, value) in finite.iter().enumerate() {
            let scaled = value / scale;
            let delta = scaled - mean;
            mean += delta / (seen + 1) as f64;
            squared += delta * (scaled - mean);
        }

        let spread = if finite.len() < 2 {
            0.0
        } else {
            (squared / (finite.len() - 1) as f64).sqrt() * scale
        };
        Distribution::guarded(mean * scale, spread)
    }
}

/// Median and scaled median absolute deviation. Outliers barely move either
/// figure, so they cannot mask themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianAbsoluteDeviation;

impl DistributionEstimator for MedianAbsoluteDeviation {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::MedianMad
    }

    fn estimate(&self, values: &[f64]) -> Distribution {
        let mut sorted = values.to_vec();
        sorted.sort_by(|left, right| left.total_cmp(right));
        let Some(median) = median_f64(&sorted) else {
            return Distribution::DEGENERATE;
        };

        let mut deviations = sorted
            .iter()
            .map(|value| (value - median).abs())
            .collect::<Vec<f64>>();
        deviations.sort_by(|left, right| left.total_cmp(right));
        let mad = median_f64(&deviations).unwrap_or(0.0);
        Distribution::guarded(median, mad * MAD_NORMAL_SCALE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    #[default]
    MeanStd,
    MedianMad,
}

impl EstimatorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MeanStd => "mean_std",
            Self::MedianMad => "median_mad",
        }
    }

    pub fn estimator(self) -> &'static dyn DistributionEstimator {
        match self {
            Self::MeanStd => &MeanStdDev,
            Self::MedianMad => &MedianAbsoluteDeviation,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "mean_std" => Some(Self::MeanStd),
            "median_mad" => Some(Self::MedianMad),
            _ => None,
        }
    }
}

fn median_f64(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let middle = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        return Some(sorted[middle - 1] / 2.0 + sorted[middle] / 2.0);
    }
    Some(sorted[middle])
}
