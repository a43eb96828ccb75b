// 🧾 Unified Transaction Model
// Both raw sources (ledger documents and invoice records) normalize into
// the single Transaction type defined here. Everything downstream - filters,
// aggregation, totals, drill-down - operates on this one shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CURRENCY PRECISION
// ============================================================================

/// The domain currency carries 3 decimal places.
pub const CURRENCY_DECIMALS: u32 = 3;

/// Tolerance for reconciliation comparisons (one thousandth of a unit).
pub const RECONCILE_TOLERANCE: f64 = 0.001;

// ============================================================================
// PAYMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }

    /// Loose parse of an invoice lifecycle field.
    ///
    /// "Paid", "PAID", "settled" all map to Paid; "unpaid", "pending",
    /// empty and anything unrecognized map to Unpaid.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.contains("unpaid") {
            return PaymentStatus::Unpaid;
        }
        if lower.contains("paid") || lower.contains("settled") {
            return PaymentStatus::Paid;
        }
        PaymentStatus::Unpaid
    }
}

// ============================================================================
// DOCUMENT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Ledger-document-derived lines carry no commercial document.
    None,
    DeliveryNote,
    Invoice,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::None => "none",
            DocumentType::DeliveryNote => "delivery_note",
            DocumentType::Invoice => "invoice",
        }
    }

    /// Loose parse of an invoice record's document-type field.
    /// Unknown strings map to None rather than failing.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.contains("delivery") || lower.contains("note") {
            DocumentType::DeliveryNote
        } else if lower.contains("invoice") {
            DocumentType::Invoice
        } else {
            DocumentType::None
        }
    }
}

// ============================================================================
// ORIGIN
// ============================================================================

/// Which raw source produced a transaction.
///
/// An invoice mirrored into a ledger document is adapted from exactly one
/// of the two sources (the invoice record - the mirror line is skipped at
/// adaptation time), so InvoiceRecord and the ledger origins are mutually
/// exclusive by construction, never deduplicated after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    ManualEntry,
    MiscEntry,
    InvoiceRecord,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::ManualEntry => "manual_entry",
            Origin::MiscEntry => "misc_entry",
            Origin::InvoiceRecord => "invoice_record",
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// The unified record produced by the Source Adapter.
///
/// Identity (`id`) is a UUID assigned at adaptation time and never enters
/// any business rule - it only anchors drill-down rows for callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "default_uuid")]
    pub id: String,

    /// Counterparty identity: supplier name or misc designation.
    pub key: String,

    /// Non-negative amount in the domain currency (3 decimals).
    pub amount: f64,

    pub date: NaiveDate,

    pub status: PaymentStatus,

    /// Free-text classification. The administrative category is always
    /// outside this engine's scope regardless of filters.
    #[serde(default)]
    pub category: String,

    pub document_type: DocumentType,

    pub origin: Origin,

    /// Who is financially responsible. Empty for ledger-derived lines.
    #[serde(default)]
    pub payer: String,

    /// Whether restricted-payer spending counts toward purchase-cost
    /// reporting. Always true for ledger-derived lines.
    #[serde(default = "default_true")]
    pub cost_of_purchase: bool,

    /// Opaque evidence references (images, documents). Passed through for
    /// drill-down display; never interpreted here.
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,

    /// Creation timestamp, used as the drill-down tie-break within a date.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// CATEGORY & PAYER HELPERS
// ============================================================================

/// The administrative category (or its abbreviation) is excluded from the
/// engine unconditionally.
pub fn is_administrative_category(category: &str) -> bool {
    let lower = category.trim().to_lowercase();
    lower == "administrative" || lower == "admin"
}

/// Misc categories are recognized by marker substring, matching how the
/// data-entry layer labels discretionary expense lines.
pub fn is_misc_category(category: &str) -> bool {
    category.trim().to_lowercase().contains("misc")
}

/// Supplier spend is either unlabelled or explicitly tagged as supplier.
pub fn is_supplier_category(category: &str) -> bool {
    let lower = category.trim().to_lowercase();
    lower.is_empty() || lower.contains("supplier")
}

/// Restricted payer roles: administrative staff and the principal owner.
///
/// Loose case-insensitive substring match, on purpose - the role field is
/// free text in the source data, and tightening this to an exact enum
/// comparison would silently change reported totals.
pub fn is_restricted_payer(payer: &str) -> bool {
    let lower = payer.trim().to_lowercase();
    lower.contains("admin") || lower.contains("owner")
}

// ============================================================================
// TESTS
// ============================================================================
