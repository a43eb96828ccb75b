// Dayledger - Ledger Aggregation & Reconciliation Engine
// Normalizes two transaction sources (per-date ledger documents with
// embedded JSON sub-ledgers, and relational invoice records) into one
// semantic model, then filters, groups, totals and drills down without
// ever losing reconcilability against the raw transaction set.
//
// Pure, synchronous, snapshot-in / result-out. Persistence, transport,
// authentication and UI live in the surrounding application.

pub mod adapter;
pub mod aggregate;
pub mod drilldown;
pub mod filter;
pub mod model;
pub mod totals;

// Re-export commonly used types
pub use adapter::{
    adapt, coerce_amount, decode_lines, labor_lines, InvoiceRecord, LaborKind, LaborLine,
    LedgerDocument, ManualLine, MiscLine,
};
pub use aggregate::{aggregate, group_by_key, Group, Partition};
pub use drilldown::drill_down;
pub use filter::{apply as apply_filters, CategoryFilter, DocTypeFilter, FilterConfig};
pub use model::{
    is_administrative_category, is_misc_category, is_restricted_payer, is_supplier_category,
    DocumentType, Origin, PaymentStatus, Transaction, CURRENCY_DECIMALS, RECONCILE_TOLERANCE,
};
pub use totals::{totals, TotalsSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
