use ledgerwatch_client::AlertConfig;
use ledgerwatch_client::pipeline::anomalies::detect_unusual_amounts;
use ledgerwatch_client::pipeline::balance::detect_low_balances;
use ledgerwatch_client::pipeline::expenditure::daily_totals;
use ledgerwatch_client::pipeline::normalize::normalize_transactions;
use ledgerwatch_client::pipeline::run_pipeline;
use ledgerwatch_client::pipeline::types::{RawTransaction, TransactionType};

/// Small deterministic generator so every run sees the same battery.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn synthetic_statement(seed: u64, len: usize) -> Vec<RawTransaction> {
    let mut rng = Lcg(seed);
    (0..len)
        .map(|_| {
            let amount = match rng.below(10) {
                0 => "n/a".to_string(),
                1 => String::new(),
                2 => format!("{}", 20_000 + rng.below(50_000)),
                _ => format!("{}.{:02}", rng.below(3_000), rng.below(100)),
            };
            let balance = match rng.below(12) {
                0 => "--".to_string(),
                _ => format!("{}", rng.below(8_000)),
            };
            let timestamp = match rng.below(15) {
                0 => "31/31/2024".to_string(),
                1 => format!("2024-03-{:02}", 1 + rng.below(28)),
                _ => format!(
                    "2024-03-{:02}T{:02}:{:02}:00+05:30",
                    1 + rng.below(28),
                    rng.below(24),
                    rng.below(60)
                ),
            };
            let kind = match rng.below(3) {
                0 => "credit",
                1 => "DEBIT",
                _ => "Debit",
            };
            RawTransaction {
                amount: Some(amount),
                transaction_type: Some(kind.to_string()),
                current_balance: Some(balance),
                transaction_timestamp: Some(timestamp),
            }
        })
        .collect()
}

fn raw(amount: &str, kind: &str, balance: &str, timestamp: &str) -> RawTransaction {
    RawTransaction {
        amount: Some(amount.to_string()),
        transaction_type: Some(kind.to_string()),
        current_balance: Some(balance.to_string()),
        transaction_timestamp: Some(timestamp.to_string()),
    }
}

#[test]
fn normalization_keeps_an_ordered_subsequence_of_complete_rows() {
    for seed in 1..40 {
        let statement = synthetic_statement(seed, 60);
        let outcome = normalize_transactions(&statement);

        let kept = outcome.table.iter().map(|row| row.index).collect::<Vec<usize>>();
        assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(kept.len() + outcome.rejected.len(), statement.len());
        for row in outcome.table.iter() {
            assert!(row.amount.is_finite());
            assert!(row.balance.is_finite());
            assert_eq!(row.date, row.timestamp.date_naive());
        }
        for rejection in &outcome.rejected {
            assert!(!kept.contains(&rejection.index));
            assert!(!rejection.reasons.is_empty());
        }
    }
}

#[test]
fn outlier_bounds_are_symmetric_and_detection_is_idempotent() {
    for seed in 1..40 {
        let table = normalize_transactions(&synthetic_statement(seed, 80)).table;
        let first = detect_unusual_amounts(&table, 3.0);
        let second = detect_unusual_amounts(&table, 3.0);
        assert_eq!(first, second);

        let bounds = first.bounds;
        let above = bounds.upper - bounds.center;
        let below = bounds.center - bounds.lower;
        assert!((above - below).abs() <= 1e-9 * bounds.center.abs().max(1.0));
        assert!(first
            .rows
            .iter()
            .all(|row| row.amount > bounds.upper || row.amount < bounds.lower));
    }
}

#[test]
fn low_balance_alerts_grow_monotonically_with_the_floor() {
    for seed in 1..25 {
        let table = normalize_transactions(&synthetic_statement(seed, 50)).table;
        let mut previous = 0usize;
        for floor in [-1.0, 0.0, 500.0, 1000.0, 2500.0, 4000.0, 7999.0, 9000.0] {
            let current = detect_low_balances(&table, floor).rows.len();
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, table.len());
    }
}

#[test]
fn daily_debit_totals_conserve_the_debit_sum() {
    for seed in 1..40 {
        let table = normalize_transactions(&synthetic_statement(seed, 70)).table;
        let grouped = daily_totals(&table, &TransactionType::Debit);
        assert!(grouped.windows(2).all(|pair| pair[0].date < pair[1].date));

        let grouped_sum = grouped.iter().map(|day| day.total).sum::<f64>();
        let direct_sum = table
            .iter()
            .filter(|row| row.transaction_type == TransactionType::Debit)
            .map(|row| row.amount)
            .sum::<f64>();
        assert!((grouped_sum - direct_sum).abs() < 1e-6);
    }
}

#[test]
fn scenario_single_low_balance_debit() {
    let report = run_pipeline(
        &[raw("100", "DEBIT", "900", "2024-01-01")],
        &AlertConfig::default(),
    );
    assert_eq!(report.low_balances.rows.len(), 1);
    assert!(report.unusual_amounts.rows.is_empty());
    assert!(report.high_expenditure.days.is_empty());
}

#[test]
fn scenario_one_day_over_the_ceiling() {
    let report = run_pipeline(
        &[
            raw("4000", "DEBIT", "20000", "2024-01-01T09:00:00"),
            raw("2000", "debit", "18000", "2024-01-01T17:00:00"),
            raw("3000", "DEBIT", "15000", "2024-01-02T09:00:00"),
        ],
        &AlertConfig::default(),
    );
    assert_eq!(report.high_expenditure.days.len(), 1);
    assert_eq!(report.high_expenditure.days[0].total, 6000.0);
    assert_eq!(report.high_expenditure.days[0].date.to_string(), "2024-01-01");
    assert_eq!(report.daily_expenditure.len(), 2);
}

#[test]
fn scenario_non_numeric_amount_is_dropped_silently() {
    let report = run_pipeline(
        &[raw("abc", "DEBIT", "10", "2024-01-01")],
        &AlertConfig::default(),
    );
    assert_eq!(report.normalization.rows_valid, 0);
    assert_eq!(report.normalization.rows_rejected, 1);
    assert!(report.low_balances.rows.is_empty());
    assert!(report.unusual_amounts.rows.is_empty());
    assert!(report.high_expenditure.days.is_empty());
}

#[test]
fn scenario_empty_statement() {
    let report = run_pipeline(&[], &AlertConfig::default());
    assert!(report.low_balances.rows.is_empty());
    assert!(report.unusual_amounts.rows.is_empty());
    assert!(report.high_expenditure.days.is_empty());
    assert!(report.unusual_amounts.bounds.center.is_finite());
}
