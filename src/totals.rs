// ⚖️ Totals Reconciler - dimension sums that must add up
// Computes the fixed set of cross-cutting totals over a filtered
// transaction list and enforces the engine's core correctness contract:
// the grand total, computed independently over the whole list, equals the
// sum of the dimension totals.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::model::{DocumentType, Origin, PaymentStatus, Transaction, RECONCILE_TOLERANCE};

// ============================================================================
// TOTALS SET
// ============================================================================

/// The fixed dimension sums. Buckets are mutually exclusive and exhaustive
/// over the filtered list: every transaction lands in exactly one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsSet {
    pub paid_invoice: f64,
    pub paid_delivery_note: f64,
    pub unpaid_invoice: f64,
    pub unpaid_delivery_note: f64,

    /// Ledger-document manual lines (always paid, no commercial document).
    pub manual_direct: f64,

    /// Ledger-document misc lines.
    pub misc: f64,

    /// Independently computed sum over the entire filtered list.
    pub grand_total: f64,
}

impl TotalsSet {
    /// Sum of the six dimension totals. Must equal `grand_total` within
    /// the currency tolerance.
    pub fn dimension_sum(&self) -> f64 {
        self.paid_invoice
            + self.paid_delivery_note
            + self.unpaid_invoice
            + self.unpaid_delivery_note
            + self.manual_direct
            + self.misc
    }
}

// ============================================================================
// BUCKET ASSIGNMENT
// ============================================================================

enum Bucket {
    PaidInvoice,
    PaidDeliveryNote,
    UnpaidInvoice,
    UnpaidDeliveryNote,
    ManualDirect,
    Misc,
}

/// Every transaction maps to exactly one bucket. Invoice records without a
/// declared document kind count in the invoice bucket; delivery notes are
/// always explicitly marked in the source data.
fn bucket_of(tx: &Transaction) -> Bucket {
    match tx.origin {
        Origin::ManualEntry => Bucket::ManualDirect,
        Origin::MiscEntry => Bucket::Misc,
        Origin::InvoiceRecord => match (tx.status, tx.document_type) {
            (PaymentStatus::Paid, DocumentType::DeliveryNote) => Bucket::PaidDeliveryNote,
            (PaymentStatus::Paid, _) => Bucket::PaidInvoice,
            (PaymentStatus::Unpaid, DocumentType::DeliveryNote) => Bucket::UnpaidDeliveryNote,
            (PaymentStatus::Unpaid, _) => Bucket::UnpaidInvoice,
        },
    }
}

// ============================================================================
// RECONCILIATION
// ============================================================================

/// Compute the totals set for a filtered transaction list.
///
/// The grand total is summed independently over the whole list and checked
/// against the dimension sums. A mismatch beyond the currency tolerance is
/// a contract violation inside the pipeline, not a data-quality issue, and
/// is raised as a hard error.
pub fn totals(transactions: &[Transaction]) -> Result<TotalsSet> {
    let mut set = TotalsSet::default();

    for tx in transactions {
        match bucket_of(tx) {
            Bucket::PaidInvoice => set.paid_invoice += tx.amount,
            Bucket::PaidDeliveryNote => set.paid_delivery_note += tx.amount,
            Bucket::UnpaidInvoice => set.unpaid_invoice += tx.amount,
            Bucket::UnpaidDeliveryNote => set.unpaid_delivery_note += tx.amount,
            Bucket::ManualDirect => set.manual_direct += tx.amount,
            Bucket::Misc => set.misc += tx.amount,
        }
    }

    set.grand_total = transactions.iter().map(|tx| tx.amount).sum();

    let drift = (set.grand_total - set.dimension_sum()).abs();
    if drift > RECONCILE_TOLERANCE {
        bail!(
            "reconciliation mismatch: grand total {:.3} != dimension sum {:.3} (drift {:.3})",
            set.grand_total,
            set.dimension_sum(),
            drift
        );
    }

    Ok(set)
}

// ============================================================================
// TESTS
// ============================================================================
