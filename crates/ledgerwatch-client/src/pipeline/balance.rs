use serde::Serialize;

use crate::pipeline::types::{NormalizedTable, NormalizedTransaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowBalanceAlerts {
    pub floor: f64,
    pub rows: Vec<NormalizedTransaction>,
}

/// Every row whose post-transaction balance is strictly below `floor`.
pub fn detect_low_balances(table: &NormalizedTable, floor: f64) -> LowBalanceAlerts {
    let rows = table
        .iter()
        .filter(|row| row.balance < floor)
        .cloned()
        .collect();
    LowBalanceAlerts { floor, rows }
}

#[cfg(test)]
mod tests {
    use super::detect_low_balances;
    use crate::pipeline::testkit::row;
    use crate::pipeline::types::{NormalizedTable, TransactionType};

    fn balances(values: &[f64]) -> NormalizedTable {
        NormalizedTable::new(
            values
                .iter()
                .enumerate()
                .map(|(index, balance)| {
                    row(index, -10.0, TransactionType::Debit, *balance, "2024-05-01T12:00:00")
                })
                .collect(),
        )
    }

    #[test]
    fn floor_comparison_is_strict() {
        let alerts = detect_low_balances(&balances(&[999.99, 1000.0, 1000.01, -5.0]), 1000.0);
        let flagged = alerts.rows.iter().map(|row| row.index).collect::<Vec<usize>>();
        assert_eq!(flagged, vec![0, 3]);
        assert_eq!(alerts.floor, 1000.0);
    }

    #[test]
    fn raising_the_floor_never_drops_an_alert() {
        let table = balances(&[250.0, 4000.0, 999.0, 1500.0, 80.0, 1000.0]);
        let mut previous = Vec::new();
        for floor in [0.0, 100.0, 999.0, 1000.0, 1500.0, 1500.01, 10_000.0] {
            let current = detect_low_balances(&table, floor)
                .rows
                .iter()
                .map(|row| row.index)
                .collect::<Vec<usize>>();
            assert!(previous.iter().all(|index| current.contains(index)));
            previous = current;
        }
        assert_eq!(previous.len(), 6);
    }
}
