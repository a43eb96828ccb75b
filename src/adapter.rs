// 🔌 Source Adapter - Two raw shapes in, one Transaction stream out
// Source (a): per-date ledger documents embedding JSON-encoded sub-ledgers
// (manual expense lines, misc expense lines, labor-cost lines).
// Source (b): relational invoice records with payment lifecycle state.
//
// This is the single translation boundary of the engine: everything after
// this module speaks Transaction only. The adapter never raises - bad data
// degrades to "excluded from this view".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{DocumentType, Origin, PaymentStatus, Transaction};

// ============================================================================
// LEDGER DOCUMENT (source a)
// ============================================================================

/// One ledger document per calendar date. Each sub-ledger is stored as raw
/// JSON text by the data-entry layer; absent or malformed text decodes to
/// an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub date: NaiveDate,

    /// JSON array of manual expense lines (supplier-keyed).
    #[serde(default)]
    pub manual_lines_json: String,

    /// JSON array of miscellaneous expense lines (designation-keyed).
    #[serde(default)]
    pub misc_lines_json: String,

    /// JSON array of labor-cost lines (advances, overtime, bonuses,
    /// salary remainders, complimentary grants).
    #[serde(default)]
    pub labor_lines_json: String,
}

/// A manual expense line as serialized inside a ledger document.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualLine {
    /// Supplier label. Maps to Transaction::key.
    #[serde(default)]
    #[serde(alias = "counterpartyLabel")]
    pub supplier: String,

    /// Number or numeric string; coerced by `coerce_amount`.
    #[serde(default)]
    pub amount: Value,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// True when this line mirrors an invoice record. The invoice is the
    /// canonical transaction, so mirrored lines are skipped here - that is
    /// how the engine guarantees no double counting.
    #[serde(default)]
    #[serde(alias = "isFromFacturation")]
    pub is_from_facturation: bool,

    #[serde(default)]
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A miscellaneous expense line, keyed by free-text designation.
#[derive(Debug, Clone, Deserialize)]
pub struct MiscLine {
    #[serde(default)]
    #[serde(alias = "counterpartyLabel")]
    pub designation: String,

    #[serde(default)]
    pub amount: Value,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// LABOR SUB-LEDGER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborKind {
    Advance,
    Overtime,
    Bonus,
    SalaryRemainder,
    Complimentary,
}

/// A labor-cost line. These never enter the supplier transaction stream;
/// they feed the generic aggregator for beneficiary-grouped reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborLine {
    #[serde(default)]
    pub beneficiary: String,

    #[serde(default)]
    pub amount: Value,

    #[serde(default)]
    pub kind: Option<LaborKind>,

    #[serde(default)]
    pub date: Option<NaiveDate>,
}

// ============================================================================
// INVOICE RECORD (source b)
// ============================================================================

/// A supplier invoice row as exposed by the relational source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(default)]
    pub id: String,

    #[serde(alias = "counterpartyName")]
    #[serde(default)]
    pub counterparty_name: String,

    #[serde(default)]
    pub amount: Value,

    pub date: NaiveDate,

    /// Payment lifecycle field, parsed loosely into PaymentStatus.
    #[serde(default)]
    pub status: String,

    #[serde(alias = "paymentMethod")]
    #[serde(default)]
    pub payment_method: String,

    #[serde(alias = "paidDate")]
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,

    #[serde(default)]
    pub payer: String,

    #[serde(default)]
    pub category: String,

    #[serde(alias = "documentType")]
    #[serde(default)]
    pub document_type: String,

    #[serde(alias = "documentNumber")]
    #[serde(default)]
    pub document_number: String,

    #[serde(alias = "evidenceRefs")]
    #[serde(default)]
    pub evidence_refs: Vec<String>,

    /// Whether restricted-payer spending counts toward purchase-cost
    /// reporting.
    #[serde(alias = "costOfPurchaseFlag")]
    #[serde(default)]
    pub cost_of_purchase_flag: bool,

    #[serde(alias = "createdAt")]
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// DECODING HELPERS
// ============================================================================

/// Decode an embedded JSON sub-ledger. Malformed or empty text is an empty
/// list, never an error - schema drift in the data-entry layer must not
/// break reporting.
pub fn decode_lines<T: serde::de::DeserializeOwned>(raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

/// Coerce a JSON amount field to f64.
///
/// Numbers pass through, numeric strings are parsed, missing/null coerces
/// to 0.0 (the record stays, contributing nothing to sums). A non-numeric
/// string cannot be coerced and the record is dropped by the caller.
pub fn coerce_amount(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Null => Some(0.0),
        _ => None,
    }
}

// ============================================================================
// ADAPTATION
// ============================================================================

/// Normalize both raw sources into the unified transaction stream.
///
/// Pure mapping: no I/O, no mutation of inputs, deterministic output order
/// (documents in input order, manual before misc within a document, then
/// invoices in input order).
pub fn adapt(documents: &[LedgerDocument], invoices: &[InvoiceRecord]) -> Vec<Transaction> {
    let mut transactions = Vec::new();

    for doc in documents {
        for line in decode_lines::<ManualLine>(&doc.manual_lines_json) {
            // Mirrored invoice lines are skipped: the invoice record is
            // the canonical transaction.
            if line.is_from_facturation {
                continue;
            }
            let key = line.supplier.trim();
            if key.is_empty() {
                continue;
            }
            let Some(amount) = coerce_amount(&line.amount) else {
                continue;
            };
            transactions.push(Transaction {
                id: uuid::Uuid::new_v4().to_string(),
                key: key.to_string(),
                amount,
                date: line.date.unwrap_or(doc.date),
                status: PaymentStatus::Paid,
                category: String::new(),
                document_type: DocumentType::None,
                origin: Origin::ManualEntry,
                payer: String::new(),
                cost_of_purchase: true,
                evidence: Vec::new(),
                created_at: line.created_at,
            });
        }

        for line in decode_lines::<MiscLine>(&doc.misc_lines_json) {
            let key = line.designation.trim();
            if key.is_empty() {
                continue;
            }
            let Some(amount) = coerce_amount(&line.amount) else {
                continue;
            };
            transactions.push(Transaction {
                id: uuid::Uuid::new_v4().to_string(),
                key: key.to_string(),
                amount,
                date: line.date.unwrap_or(doc.date),
                status: PaymentStatus::Paid,
                category: "misc".to_string(),
                document_type: DocumentType::None,
                origin: Origin::MiscEntry,
                payer: String::new(),
                cost_of_purchase: true,
                evidence: Vec::new(),
                created_at: line.created_at,
            });
        }
    }

    for invoice in invoices {
        let key = invoice.counterparty_name.trim();
        if key.is_empty() {
            continue;
        }
        let Some(amount) = coerce_amount(&invoice.amount) else {
            continue;
        };
        transactions.push(Transaction {
            id: if invoice.id.is_empty() {
                uuid::Uuid::new_v4().to_string()
            } else {
                invoice.id.clone()
            },
            key: key.to_string(),
            amount,
            date: invoice.date,
            status: PaymentStatus::parse(&invoice.status),
            category: invoice.category.clone(),
            document_type: DocumentType::parse(&invoice.document_type),
            origin: Origin::InvoiceRecord,
            payer: invoice.payer.clone(),
            cost_of_purchase: invoice.cost_of_purchase_flag,
            evidence: invoice.evidence_refs.clone(),
            created_at: invoice.created_at,
        });
    }

    transactions
}

/// Decode the labor sub-ledgers of a document set, dropping lines without
/// a beneficiary or with an uncoercible amount. Callers group the result
/// with `aggregate::group_by_key` for beneficiary reporting.
pub fn labor_lines(documents: &[LedgerDocument]) -> Vec<LaborLine> {
    documents
        .iter()
        .flat_map(|doc| decode_lines::<LaborLine>(&doc.labor_lines_json))
        .filter(|line| {
            !line.beneficiary.trim().is_empty() && coerce_amount(&line.amount).is_some()
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    fn make_document(date: &str, manual: &str, misc: &str) -> LedgerDocument {
        LedgerDocument {
            date: d(date),
            manual_lines_json: manual.to_string(),
            misc_lines_json: misc.to_string(),
            labor_lines_json: String::new(),
        }
    }

    fn make_invoice(name: &str, amount: f64, status: &str) -> InvoiceRecord {
        InvoiceRecord {
            id: String::new(),
            counterparty_name: name.to_string(),
            amount: serde_json::json!(amount),
            date: d("2024-01-10"),
            status: status.to_string(),
            payment_method: "cash".to_string(),
            paid_date: None,
            payer: "cashier".to_string(),
            category: String::new(),
            document_type: "invoice".to_string(),
            document_number: "F-001".to_string(),
            evidence_refs: Vec::new(),
            cost_of_purchase_flag: false,
            created_at: None,
        }
    }

    #[test]
    fn test_manual_and_misc_lines_adapted() {
        let doc = make_document(
            "2024-01-05",
            r#"[{"supplier": "ACME", "amount": 50.0}]"#,
            r#"[{"designation": "cleaning", "amount": "12.500"}]"#,
        );

        let transactions = adapt(&[doc], &[]);
        assert_eq!(transactions.len(), 2);

        assert_eq!(transactions[0].key, "ACME");
        assert_eq!(transactions[0].amount, 50.0);
        assert_eq!(transactions[0].origin, Origin::ManualEntry);
        assert_eq!(transactions[0].status, PaymentStatus::Paid);
        assert_eq!(transactions[0].document_type, DocumentType::None);
        assert_eq!(transactions[0].date, d("2024-01-05"));

        assert_eq!(transactions[1].key, "cleaning");
        assert_eq!(transactions[1].amount, 12.5);
        assert_eq!(transactions[1].origin, Origin::MiscEntry);
    }

    #[test]
    fn test_mirrored_invoice_line_skipped() {
        // The ledger copy of an invoiced purchase must not produce a second
        // transaction.
        let doc = make_document(
            "2024-01-05",
            r#"[
                {"supplier": "ACME", "amount": 100.0, "isFromFacturation": true},
                {"supplier": "ACME", "amount": 50.0, "isFromFacturation": false}
            ]"#,
            "",
        );
        let invoice = make_invoice("ACME", 100.0, "paid");

        let transactions = adapt(&[doc], &[invoice]);
        assert_eq!(transactions.len(), 2);

        let total: f64 = transactions.iter().map(|t| t.amount).sum();
        assert!((total - 150.0).abs() < 0.001);

        let from_ledger = transactions
            .iter()
            .filter(|t| t.origin == Origin::ManualEntry)
            .count();
        assert_eq!(from_ledger, 1);
    }

    #[test]
    fn test_malformed_sub_ledger_decodes_empty() {
        let doc = make_document("2024-01-05", "{not json", "[[broken");
        let transactions = adapt(&[doc], &[]);
        assert!(transactions.is_empty());
    }

    #[test]
    fn test_missing_key_or_bad_amount_dropped() {
        let doc = make_document(
            "2024-01-05",
            r#"[
                {"supplier": "", "amount": 10.0},
                {"supplier": "  ", "amount": 10.0},
                {"supplier": "OK", "amount": "abc"},
                {"supplier": "KEPT", "amount": null}
            ]"#,
            "",
        );
        let transactions = adapt(&[doc], &[]);

        // Empty keys and the unparsable amount are dropped; the null amount
        // coerces to 0 and the record stays.
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].key, "KEPT");
        assert_eq!(transactions[0].amount, 0.0);
    }

    #[test]
    fn test_invoice_maps_one_to_one() {
        let mut invoice = make_invoice("Metro Foods", 245.750, "unpaid");
        invoice.document_type = "delivery_note".to_string();
        invoice.evidence_refs = vec!["img://receipt-17".to_string()];
        invoice.payer = "admin".to_string();
        invoice.cost_of_purchase_flag = true;

        let transactions = adapt(&[], &[invoice]);
        assert_eq!(transactions.len(), 1);

        let tx = &transactions[0];
        assert_eq!(tx.key, "Metro Foods");
        assert_eq!(tx.status, PaymentStatus::Unpaid);
        assert_eq!(tx.document_type, DocumentType::DeliveryNote);
        assert_eq!(tx.origin, Origin::InvoiceRecord);
        assert_eq!(tx.payer, "admin");
        assert!(tx.cost_of_purchase);
        assert_eq!(tx.evidence, vec!["img://receipt-17".to_string()]);
    }

    #[test]
    fn test_line_date_overrides_document_date() {
        let doc = make_document(
            "2024-01-05",
            r#"[{"supplier": "ACME", "amount": 5, "date": "2024-01-03"}]"#,
            "",
        );
        let transactions = adapt(&[doc], &[]);
        assert_eq!(transactions[0].date, d("2024-01-03"));
    }

    #[test]
    fn test_coerce_amount_table() {
        assert_eq!(coerce_amount(&serde_json::json!(42.5)), Some(42.5));
        assert_eq!(coerce_amount(&serde_json::json!("42.5")), Some(42.5));
        assert_eq!(coerce_amount(&serde_json::json!(" 7 ")), Some(7.0));
        assert_eq!(coerce_amount(&serde_json::json!("")), Some(0.0));
        assert_eq!(coerce_amount(&Value::Null), Some(0.0));
        assert_eq!(coerce_amount(&serde_json::json!("abc")), None);
        assert_eq!(coerce_amount(&serde_json::json!([1, 2])), None);
    }

    #[test]
    fn test_labor_lines_decoded_fail_soft() {
        let mut doc = make_document("2024-01-05", "", "");
        doc.labor_lines_json = r#"[
            {"beneficiary": "Karim", "amount": 30.0, "kind": "advance"},
            {"beneficiary": "", "amount": 10.0},
            {"beneficiary": "Nora", "amount": "junk"}
        ]"#
        .to_string();

        let lines = labor_lines(&[doc]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].beneficiary, "Karim");
        assert_eq!(lines[0].kind, Some(LaborKind::Advance));
    }
}
