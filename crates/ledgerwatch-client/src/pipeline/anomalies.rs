use serde::Serialize;

use crate::pipeline::stats::{DistributionEstimator, EstimatorKind, MeanStdDev};
use crate::pipeline::types::{NormalizedTable, NormalizedTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub estimator: EstimatorKind,
    pub multiplier: f64,
    pub center: f64,
    pub spread: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.lower && amount <= self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnusualAmountAlerts {
    pub bounds: OutlierBounds,
    pub rows: Vec<NormalizedTransaction>,
}

pub fn detect_unusual_amounts(table: &NormalizedTable, multiplier: f64) -> UnusualAmountAlerts {
    detect_unusual_amounts_with(table, &MeanStdDev, multiplier)
}

/// Flags rows whose amount falls outside `center ± multiplier * spread`,
/// where both figures come from `estimator` run over the whole table.
pub fn detect_unusual_amounts_with(
    table: &NormalizedTable,
    estimator: &dyn DistributionEstimator,
    multiplier: f64,
) -> UnusualAmountAlerts {
    let distribution = estimator.estimate(&table.amounts());
    let multiplier = if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        0.0
    };
    let reach = multiplier * distribution.spread;
    let bounds = OutlierBounds {
        estimator: estimator.kind(),
        multiplier,
        center: distribution.center,
        spread: distribution.spread,
        lower: distribution.center - reach,
        upper: distribution.center + reach,
    };

    let rows = table
        .iter()
        .filter(|row| !bounds.contains(row.amount))
        .cloned()
        .collect();

    UnusualAmountAlerts { bounds, rows }
}

#[cfg(test)]
mod tests {
    use super::{detect_unusual_amounts, detect_unusual_amounts_with};
    use crate::pipeline::stats::MedianAbsoluteDeviation;
    use crate::pipeline::testkit::table_of_amounts as table;

    #[test]
    fn flags_amounts_beyond_three_sample_deviations() {
        let mut amounts = vec![100.0; 20];
        amounts.push(10_000.0);
        let alerts = detect_unusual_amounts(&table(&amounts), 3.0);

        assert_eq!(alerts.rows.len(), 1);
        assert_eq!(alerts.rows[0].index, 20);
        assert!(alerts.bounds.upper < 10_000.0);
    }

    #[test]
    fn single_row_is_not_flagged() {
        let alerts = detect_unusual_amounts(&table(&[100.0]), 3.0);
        assert!(alerts.rows.is_empty());
        assert_eq!(alerts.bounds.lower, 100.0);
        assert_eq!(alerts.bounds.upper, 100.0);
    }

    #[test]
    fn empty_table_yields_finite_bounds_and_no_alerts() {
        let alerts = detect_unusual_amounts(&table(&[]), 3.0);
        assert!(alerts.rows.is_empty());
        assert!(alerts.bounds.lower.is_finite());
        assert!(alerts.bounds.upper.is_finite());
    }

    #[test]
    fn zero_multiplier_flags_everything_off_center() {
        let alerts = detect_unusual_amounts(&table(&[10.0, 20.0, 30.0]), 0.0);
        let flagged = alerts.rows.iter().map(|row| row.index).collect::<Vec<usize>>();
        assert_eq!(flagged, vec![0, 2]);
    }

    #[test]
    fn bounds_are_symmetric_around_the_center() {
        let alerts = detect_unusual_amounts(&table(&[12.0, -40.0, 310.5, 77.25, 5.0]), 3.0);
        let bounds = alerts.bounds;
        assert!(((bounds.upper - bounds.center) - (bounds.center - bounds.lower)).abs() < 1e-9);
    }

    #[test]
    fn robust_estimator_catches_an_outlier_that_masks_itself() {
        let rows = table(&[100.0, 101.0, 99.0, 100.0, 102.0, 98.0, 2500.0]);
        let masked = detect_unusual_amounts(&rows, 3.0);
        assert!(masked.rows.is_empty());

        let robust = detect_unusual_amounts_with(&rows, &MedianAbsoluteDeviation, 3.0);
        assert_eq!(robust.rows.len(), 1);
        assert_eq!(robust.rows[0].amount, 2500.0);
    }

    #[test]
    fn identical_amounts_near_the_float_limit_are_not_flagged() {
        let alerts = detect_unusual_amounts(&table(&[1e308, 1e308]), 3.0);
        assert!(alerts.rows.is_empty());
        assert_eq!(alerts.bounds.center, 1e308);
        assert_eq!(alerts.bounds.lower, 1e308);
        assert_eq!(alerts.bounds.upper, 1e308);
    }

    #[test]
    fn huge_symmetric_amounts_keep_a_finite_spread() {
        let alerts = detect_unusual_amounts(&table(&[1e200, -1e200, 0.0]), 3.0);
        assert!(alerts.rows.is_empty());
        assert!(alerts.bounds.spread.is_finite());
        assert!(alerts.bounds.spread > 9e199);
    }

    #[test]
    fn detection_is_repeatable() {
        let rows = table(&[5.0, 7.0, 9.0, 11.0, 400.0]);
        assert_eq!(
            detect_unusual_amounts(&rows, 1.0),
            detect_unusual_amounts(&rows, 1.0)
        );
    }
}
