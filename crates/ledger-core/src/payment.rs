//! # Payment Method Classification
//!
//! Maps the checkout orchestrator's free-form payment method strings onto
//! the three drawer buckets the register tracks.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout sends: "CASH" | "CREDIT_CARD" | "DEBIT_CARD" | "PIX" | ...   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  classify_payment_method() ← normalization + bucketing                 │
//! │       │                                                                 │
//! │       ├── Cash  → total_cash  (counts toward the physical drawer)      │
//! │       ├── Card  → total_card  (settles outside the drawer)             │
//! │       ├── Pix   → total_pix   (settles outside the drawer)             │
//! │       └── Unclassified → total_sales only (logged by the caller)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unclassified method still increases `total_sales`, so the three
//! buckets can sum to less than `total_sales`. That asymmetry is preserved
//! deliberately; the register logs it so it is observable.

use serde::{Deserialize, Serialize};

/// Drawer bucket a payment method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentBucket {
    /// Physical cash; the only bucket inside the drawer reconciliation.
    Cash,
    /// Any credit or debit card variant.
    Card,
    /// PIX instant transfer.
    Pix,
    /// Method outside the three tracked buckets.
    Unclassified,
}

impl PaymentBucket {
    /// Whether this bucket participates in the cash reconciliation.
    #[inline]
    pub fn counts_in_drawer(&self) -> bool {
        matches!(self, PaymentBucket::Cash)
    }
}

/// Classifies a raw payment method string into a drawer bucket.
///
/// Normalization: trim, uppercase, and treat spaces and hyphens as
/// underscores, so "credit card", "Credit-Card" and "CREDIT_CARD" all
/// classify the same way.
///
/// ## Example
/// ```rust
/// use ledger_core::payment::{classify_payment_method, PaymentBucket};
///
/// assert_eq!(classify_payment_method("CASH"), PaymentBucket::Cash);
/// assert_eq!(classify_payment_method("debit card"), PaymentBucket::Card);
/// assert_eq!(classify_payment_method("Pix"), PaymentBucket::Pix);
/// assert_eq!(classify_payment_method("VOUCHER"), PaymentBucket::Unclassified);
/// ```
pub fn classify_payment_method(method: &str) -> PaymentBucket {
    let normalized: String = method
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            _ => c.to_ascii_uppercase(),
        })
        .collect();

    match normalized.as_str() {
        "CASH" | "DINHEIRO" => PaymentBucket::Cash,
        "CARD" | "CREDIT_CARD" | "DEBIT_CARD" | "CREDIT" | "DEBIT" => PaymentBucket::Card,
        "PIX" => PaymentBucket::Pix,
        _ => PaymentBucket::Unclassified,
    }
}
