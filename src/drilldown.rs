// 🔍 Drill-Down Resolver - expand a group back into raw transactions
// Given a counterparty key, returns the matching raw transactions in
// display order: newest date first, same-date entries by newest creation
// timestamp, otherwise original input order. Evidence references ride
// along untouched - resolving them into viewable content is the caller's
// job.

use std::cmp::Ordering;

use crate::model::Transaction;

/// Resolve a group key back into its underlying transactions.
///
/// The caller chooses whether to pass the filtered or unfiltered list;
/// the resolver only matches and orders.
pub fn drill_down(transactions: &[Transaction], key: &str) -> Vec<Transaction> {
    let mut matching: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| tx.key == key)
        .cloned()
        .collect();

    // Stable sort: entries without creation timestamps keep input order.
    matching.sort_by(|a, b| {
        b.date.cmp(&a.date).then_with(|| match (a.created_at, b.created_at) {
            (Some(ca), Some(cb)) => cb.cmp(&ca),
            _ => Ordering::Equal,
        })
    });

    matching
}

// ============================================================================
// TESTS
// ============================================================================
