// 📊 Aggregator - group by counterparty, sum, sort
// One generic {key, amount} grouping core, reused for supplier spend,
// beneficiary labor costs and complimentary-item grants. Nothing in here
// may assume invoice-only fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{PaymentStatus, Transaction};

// ============================================================================
// GROUP
// ============================================================================

/// One output row per distinct key surviving the filter pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub key: String,
    pub total_amount: f64,
    pub transaction_count: usize,
}

// ============================================================================
// PARTITION
// ============================================================================

/// Status partition for the transaction-level entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl Partition {
    fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            Partition::All => true,
            Partition::Paid => status == PaymentStatus::Paid,
            Partition::Unpaid => status == PaymentStatus::Unpaid,
        }
    }
}

// ============================================================================
// GENERIC GROUPING CORE
// ============================================================================

/// Group any item stream by key and sum amounts per group.
///
/// - groups appear in first-encountered order before sorting;
/// - groups whose sum is not positive are discarded;
/// - result is sorted by descending sum, stable, so equal sums keep their
///   first-encountered order and output is deterministic for identical
///   input.
pub fn group_by_key<T, K, A>(items: &[T], key_fn: K, amount_fn: A) -> Vec<Group>
where
    K: Fn(&T) -> &str,
    A: Fn(&T) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for item in items {
        let key = key_fn(item);
        let amount = amount_fn(item);

        match index.get(key) {
            Some(&slot) => {
                groups[slot].total_amount += amount;
                groups[slot].transaction_count += 1;
            }
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(Group {
                    key: key.to_string(),
                    total_amount: amount,
                    transaction_count: 1,
                });
            }
        }
    }

    groups.retain(|group| group.total_amount > 0.0);

    // Vec::sort_by is stable: ties keep insertion order.
    groups.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    groups
}

// ============================================================================
// TRANSACTION ENTRY POINT
// ============================================================================

/// Group a filtered transaction list by counterparty under a status
/// partition.
pub fn aggregate(transactions: &[Transaction], partition: Partition) -> Vec<Group> {
    let selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| partition.matches(tx.status))
        .collect();

    group_by_key(&selected, |tx| tx.key.as_str(), |tx| tx.amount)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{labor_lines, LedgerDocument};
    use crate::model::{DocumentType, Origin};
    use chrono::NaiveDate;

    fn make_tx(key: &str, amount: f64, status: PaymentStatus) -> Transaction {
        Transaction {
            id: String::new(),
            key: key.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status,
            category: String::new(),
            document_type: DocumentType::Invoice,
            origin: Origin::InvoiceRecord,
            payer: "cashier".to_string(),
            cost_of_purchase: false,
            evidence: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_groups_summed_and_sorted_descending() {
        let txs = [
            make_tx("ACME", 50.0, PaymentStatus::Paid),
            make_tx("Metro", 120.0, PaymentStatus::Paid),
            make_tx("ACME", 100.0, PaymentStatus::Paid),
        ];

        let groups = aggregate(&txs, Partition::All);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "ACME");
        assert_eq!(groups[0].total_amount, 150.0);
        assert_eq!(groups[0].transaction_count, 2);
        assert_eq!(groups[1].key, "Metro");
    }

    #[test]
    fn test_partition_selects_by_status() {
        let txs = [
            make_tx("ACME", 50.0, PaymentStatus::Paid),
            make_tx("ACME", 30.0, PaymentStatus::Unpaid),
            make_tx("Metro", 20.0, PaymentStatus::Unpaid),
        ];

        let unpaid = aggregate(&txs, Partition::Unpaid);
        assert_eq!(unpaid.len(), 2);
        assert_eq!(unpaid[0].key, "ACME");
        assert_eq!(unpaid[0].total_amount, 30.0);

        let paid = aggregate(&txs, Partition::Paid);
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].total_amount, 50.0);
    }

    #[test]
    fn test_non_positive_groups_discarded() {
        let txs = [
            make_tx("Zero", 0.0, PaymentStatus::Paid),
            make_tx("Kept", 5.0, PaymentStatus::Paid),
        ];

        let groups = aggregate(&txs, Partition::All);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Kept");
    }

    #[test]
    fn test_equal_sums_keep_first_encountered_order() {
        let txs = [
            make_tx("First", 40.0, PaymentStatus::Paid),
            make_tx("Second", 40.0, PaymentStatus::Paid),
            make_tx("Third", 90.0, PaymentStatus::Paid),
        ];

        let groups = aggregate(&txs, Partition::All);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let txs = [
            make_tx("B", 10.0, PaymentStatus::Paid),
            make_tx("A", 10.0, PaymentStatus::Paid),
            make_tx("B", 25.0, PaymentStatus::Paid),
        ];

        let first = aggregate(&txs, Partition::All);
        let second = aggregate(&txs, Partition::All);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generic_core_groups_labor_lines() {
        // Beneficiary-grouped labor costs go through the same grouping core
        // as supplier spend.
        let doc = LedgerDocument {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            manual_lines_json: String::new(),
            misc_lines_json: String::new(),
            labor_lines_json: r#"[
                {"beneficiary": "Karim", "amount": 30.0, "kind": "advance"},
                {"beneficiary": "Nora", "amount": 45.0, "kind": "overtime"},
                {"beneficiary": "Karim", "amount": 20.0, "kind": "bonus"}
            ]"#
            .to_string(),
        };

        let lines = labor_lines(&[doc]);
        let groups = group_by_key(
            &lines,
            |line| line.beneficiary.as_str(),
            |line| crate::adapter::coerce_amount(&line.amount).unwrap_or(0.0),
        );

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Karim");
        assert_eq!(groups[0].total_amount, 50.0);
        assert_eq!(groups[1].key, "Nora");
    }
}
