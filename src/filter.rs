// 🔽 Filter Pipeline - attribution, category, document type, name search
// Applies the business inclusion rules to the normalized transaction list.
// Order-preserving: output is the input minus excluded records.
//
// Unrecognized filter values fail OPEN (treated as "all"). That is a
// deliberate product decision: a typo in a saved filter must widen the
// view, never silently hide data.

use serde::{Deserialize, Serialize};

use crate::model::{
    is_administrative_category, is_misc_category, is_restricted_payer, is_supplier_category,
    DocumentType, Transaction,
};

// ============================================================================
// FILTER OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Supplier,
    Misc,
}

impl CategoryFilter {
    /// Fail-open parse: anything unrecognized is All.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "supplier" => CategoryFilter::Supplier,
            "misc" => CategoryFilter::Misc,
            _ => CategoryFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocTypeFilter {
    #[default]
    All,
    DeliveryNote,
    Invoice,
}

impl DocTypeFilter {
    /// Fail-open parse: anything unrecognized is All.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "delivery_note" => DocTypeFilter::DeliveryNote,
            "invoice" => DocTypeFilter::Invoice,
            _ => DocTypeFilter::All,
        }
    }

    fn matches(&self, document_type: DocumentType) -> bool {
        match self {
            DocTypeFilter::All => true,
            DocTypeFilter::DeliveryNote => document_type == DocumentType::DeliveryNote,
            DocTypeFilter::Invoice => document_type == DocumentType::Invoice,
        }
    }
}

/// Caller-selected filter configuration. The payer-attribution and
/// administrative-exclusion rules are always applied and have no
/// configuration knob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub category: CategoryFilter,

    #[serde(default)]
    pub document_type: DocTypeFilter,

    /// Case-insensitive substring match on the counterparty key.
    /// Empty matches everything.
    #[serde(default)]
    pub name_search: String,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Payer attribution rule: spending by administrative staff or the
/// principal owner counts toward purchase-cost reporting only when it
/// carries the explicit cost-of-purchase flag. Every other payer always
/// counts.
fn passes_attribution(tx: &Transaction) -> bool {
    if is_restricted_payer(&tx.payer) {
        tx.cost_of_purchase
    } else {
        true
    }
}

fn passes_category(tx: &Transaction, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Supplier => is_supplier_category(&tx.category),
        CategoryFilter::Misc => is_misc_category(&tx.category),
    }
}

fn passes_name_search(tx: &Transaction, needle_lower: &str) -> bool {
    needle_lower.is_empty() || tx.key.to_lowercase().contains(needle_lower)
}

/// Apply the full pipeline to a normalized transaction list.
///
/// Rule order: payer attribution, administrative exclusion, category
/// filter, document-type filter, name search. Administrative-category
/// transactions never survive, for any configuration.
pub fn apply(transactions: &[Transaction], config: &FilterConfig) -> Vec<Transaction> {
    let needle_lower = config.name_search.trim().to_lowercase();

    transactions
        .iter()
        .filter(|tx| passes_attribution(tx))
        .filter(|tx| !is_administrative_category(&tx.category))
        .filter(|tx| passes_category(tx, config.category))
        .filter(|tx| config.document_type.matches(tx.document_type))
        .filter(|tx| passes_name_search(tx, &needle_lower))
        .cloned()
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
