//! # Drawer Reconciliation
//!
//! The closing math for a cash register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  expected = opening + total_cash + total_deposits - total_withdrawals  │
//! │                                                                         │
//! │  Card and PIX totals settle outside the physical drawer and are        │
//! │  deliberately excluded: only cash ever entered or left the till.       │
//! │                                                                         │
//! │  difference = counted - expected                                        │
//! │     negative → shortage, positive → overage                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Kept as pure functions so the closing formula is testable without a
//! database and auditable in one place.

use crate::money::Money;

/// Outcome of reconciling a counted drawer against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Balance the ledger says the drawer should hold.
    pub expected: Money,
    /// counted - expected. Negative = shortage, positive = overage.
    pub difference: Money,
}

/// Computes the expected drawer balance at closing time.
pub fn expected_balance(
    opening: Money,
    total_cash: Money,
    total_deposits: Money,
    total_withdrawals: Money,
) -> Money {
    opening + total_cash + total_deposits - total_withdrawals
}

/// Reconciles a physically counted closing balance against the ledger.
///
/// ## Example
/// ```rust
/// use ledger_core::money::Money;
/// use ledger_core::reconcile::reconcile_drawer;
///
/// // open(100), CASH sale 50, withdrawal 20, counted 130
/// let r = reconcile_drawer(
///     Money::from_cents(10000),
///     Money::from_cents(5000),
///     Money::zero(),
///     Money::from_cents(2000),
///     Money::from_cents(13000),
/// );
/// assert_eq!(r.expected.cents(), 13000);
/// assert!(r.difference.is_zero());
/// ```
pub fn reconcile_drawer(
    opening: Money,
    total_cash: Money,
    total_deposits: Money,
    total_withdrawals: Money,
    counted: Money,
) -> Reconciliation {
    let expected = expected_balance(opening, total_cash, total_deposits, total_withdrawals);
    Reconciliation {
        expected,
        difference: counted - expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_round_trip_no_activity() {
        // open(200) then immediately close(200)
        let r = reconcile_drawer(cents(200), Money::zero(), Money::zero(), Money::zero(), cents(200));
        assert_eq!(r.expected, cents(200));
        assert!(r.difference.is_zero());
    }

    #[test]
    fn test_card_and_pix_excluded() {
        // open(100), CASH 50, PIX 30, withdrawal 20 → expected 130
        // PIX does not appear in the inputs at all; only cash-side flows do.
        let r = reconcile_drawer(cents(100), cents(50), Money::zero(), cents(20), cents(130));
        assert_eq!(r.expected, cents(130));
        assert!(r.difference.is_zero());
    }

    #[test]
    fn test_shortage_is_negative() {
        let r = reconcile_drawer(cents(100), cents(50), Money::zero(), Money::zero(), cents(140));
        assert_eq!(r.expected, cents(150));
        assert_eq!(r.difference, cents(-10));
    }

    #[test]
    fn test_overage_is_positive() {
        let r = reconcile_drawer(cents(100), Money::zero(), cents(40), Money::zero(), cents(145));
        assert_eq!(r.expected, cents(140));
        assert_eq!(r.difference, cents(5));
    }
}
