//! # Cash Register Repository
//!
//! The cash-drawer (register) lifecycle ledger.
//!
//! ## Register Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Register Lifecycle                                  │
//! │                                                                         │
//! │  no-register ──open()──► OPEN ──close()──► CLOSED (archival)           │
//! │                           │                                             │
//! │                           ├── add_sale()   → running totals            │
//! │                           ├── withdrawal() → CashMovement + total      │
//! │                           └── deposit()    → CashMovement + total      │
//! │                                                                         │
//! │  Invariant: at most one OPEN register per salon at any instant.        │
//! │  Enforced by the partial unique index ux_cash_registers_open; open()   │
//! │  inserts and maps the violation to Conflict (never check-then-insert   │
//! │  across two round trips).                                              │
//! │                                                                         │
//! │  add_sale() with no open drawer and a known actor AUTO-OPENS a zero-   │
//! │  balance register: a finalized sale is never dropped because the       │
//! │  manual open workflow was skipped. This is compliance policy, not a    │
//! │  bug to fix.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Running totals are only ever mutated with `SET total = total + ?` inside
//! a single statement, so concurrent postings cannot lose updates.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ledger_core::payment::{classify_payment_method, PaymentBucket};
use ledger_core::reconcile::reconcile_drawer;
use ledger_core::validation::{
    validate_non_negative_amount, validate_positive_amount, validate_reason,
};
use ledger_core::{CashMovement, CashMovementType, CashRegister, Money, RegisterStatus};

/// Outcome of posting a finalized sale to the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalePosting {
    /// Posted to the already-open register.
    Posted { register_id: String },
    /// No drawer was open; a zero-balance register was auto-opened for the
    /// acting user and the sale posted to it.
    AutoOpened { register_id: String },
    /// No drawer was open and no actor was supplied; the sale total was not
    /// posted to any register. Logged, never silent.
    Unposted,
}

/// Repository for cash register operations.
#[derive(Debug, Clone)]
pub struct RegisterRepository {
    pool: SqlitePool,
}

impl RegisterRepository {
    /// Creates a new RegisterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegisterRepository { pool }
    }

    /// Gets the OPEN register for a salon, if any.
    pub async fn current(&self, salon_id: &str) -> DbResult<Option<CashRegister>> {
        let register = sqlx::query_as::<_, CashRegister>(
            "SELECT * FROM cash_registers WHERE salon_id = ?1 AND status = 'open'",
        )
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(register)
    }

    /// Opens a new register for a salon.
    ///
    /// Fails with Conflict if an OPEN register already exists. The partial
    /// unique index is the arbiter: two concurrent open() calls both insert
    /// and exactly one wins.
    pub async fn open(
        &self,
        salon_id: &str,
        opening_balance_cents: i64,
        actor_id: &str,
    ) -> DbResult<CashRegister> {
        validate_non_negative_amount("opening_balance", opening_balance_cents)?;

        let register = new_open_register(salon_id, opening_balance_cents, actor_id);

        debug!(salon_id = %salon_id, register_id = %register.id, "Opening cash register");

        self.insert_register(&register).await.map_err(|e| {
            if e.is_conflict() {
                DbError::conflict("a cash register is already open for this salon")
            } else {
                e
            }
        })?;

        info!(
            salon_id = %salon_id,
            register_id = %register.id,
            opening_balance = %register.opening_balance(),
            "Cash register opened"
        );

        Ok(register)
    }

    /// Posts a finalized sale to the salon's open register.
    ///
    /// ## Payment Buckets
    /// `total_sales` always grows; exactly one of `total_cash`/`total_card`/
    /// `total_pix` grows when the method classifies into a bucket. An
    /// unclassified method grows `total_sales` only - preserved behavior,
    /// logged so the bucket shortfall is observable.
    ///
    /// ## Auto-Open Fallback
    /// With no open register and a known actor, a zero-balance register is
    /// auto-opened first. If that insert loses the race against a concurrent
    /// open(), the winner's register is used instead.
    pub async fn add_sale(
        &self,
        salon_id: &str,
        payment_method: &str,
        amount_cents: i64,
        actor_id: Option<&str>,
    ) -> DbResult<SalePosting> {
        validate_positive_amount("amount", amount_cents)?;

        let bucket = classify_payment_method(payment_method);
        if bucket == PaymentBucket::Unclassified {
            warn!(
                salon_id = %salon_id,
                payment_method = %payment_method,
                "Unclassified payment method: amount counts toward total_sales only"
            );
        }

        let (cash, card, pix) = match bucket {
            PaymentBucket::Cash => (amount_cents, 0, 0),
            PaymentBucket::Card => (0, amount_cents, 0),
            PaymentBucket::Pix => (0, 0, amount_cents),
            PaymentBucket::Unclassified => (0, 0, 0),
        };

        let mut auto_opened = false;

        // Two passes: one for the normal path, one more after an auto-open
        // or a lost open race.
        for _ in 0..2 {
            if let Some(register) = self.current(salon_id).await? {
                let rows = sqlx::query(
                    r#"
                    UPDATE cash_registers SET
                        total_sales_cents = total_sales_cents + ?2,
                        total_cash_cents  = total_cash_cents  + ?3,
                        total_card_cents  = total_card_cents  + ?4,
                        total_pix_cents   = total_pix_cents   + ?5
                    WHERE id = ?1 AND status = 'open'
                    "#,
                )
                .bind(&register.id)
                .bind(amount_cents)
                .bind(cash)
                .bind(card)
                .bind(pix)
                .execute(&self.pool)
                .await?
                .rows_affected();

                if rows == 1 {
                    debug!(
                        register_id = %register.id,
                        amount = %Money::from_cents(amount_cents),
                        ?bucket,
                        "Sale posted to register"
                    );
                    return Ok(if auto_opened {
                        SalePosting::AutoOpened {
                            register_id: register.id,
                        }
                    } else {
                        SalePosting::Posted {
                            register_id: register.id,
                        }
                    });
                }
                // Register closed between read and update; re-evaluate.
                continue;
            }

            let Some(actor) = actor_id else {
                warn!(
                    salon_id = %salon_id,
                    amount = %Money::from_cents(amount_cents),
                    payment_method = %payment_method,
                    "Sale finalized with no open register and no actor: total not posted"
                );
                return Ok(SalePosting::Unposted);
            };

            let register = new_open_register(salon_id, 0, actor);
            match self.insert_register(&register).await {
                Ok(()) => {
                    info!(
                        salon_id = %salon_id,
                        register_id = %register.id,
                        actor_id = %actor,
                        "Auto-opened zero-balance register for finalized sale"
                    );
                    auto_opened = true;
                }
                // Lost the race to a concurrent open(); post to the winner.
                Err(e) if e.is_conflict() => {}
                Err(e) => return Err(e),
            }
        }

        Err(DbError::conflict(
            "could not post sale: register state changed concurrently",
        ))
    }

    /// Records a cash withdrawal from an open register.
    ///
    /// The CashMovement row and the running-total increment commit as one
    /// transaction: a movement without its total update is a correctness
    /// defect.
    pub async fn withdrawal(
        &self,
        register_id: &str,
        amount_cents: i64,
        reason: &str,
        actor_id: &str,
    ) -> DbResult<CashMovement> {
        self.cash_movement(register_id, CashMovementType::Withdrawal, amount_cents, reason, actor_id)
            .await
    }

    /// Records a cash deposit into an open register.
    pub async fn deposit(
        &self,
        register_id: &str,
        amount_cents: i64,
        reason: &str,
        actor_id: &str,
    ) -> DbResult<CashMovement> {
        self.cash_movement(register_id, CashMovementType::Deposit, amount_cents, reason, actor_id)
            .await
    }

    async fn cash_movement(
        &self,
        register_id: &str,
        movement_type: CashMovementType,
        amount_cents: i64,
        reason: &str,
        actor_id: &str,
    ) -> DbResult<CashMovement> {
        validate_positive_amount("amount", amount_cents)?;
        let reason = validate_reason(reason)?;

        let total_column = match movement_type {
            CashMovementType::Withdrawal => "total_withdrawals_cents",
            CashMovementType::Deposit => "total_deposits_cents",
        };

        let mut tx = self.pool.begin().await?;

        let update_sql = format!(
            "UPDATE cash_registers SET {0} = {0} + ?2 WHERE id = ?1 AND status = 'open'",
            total_column
        );
        let rows = sqlx::query(&update_sql)
            .bind(register_id)
            .bind(amount_cents)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            // Distinguish a missing register from a closed one.
            let status: Option<RegisterStatus> =
                sqlx::query_scalar("SELECT status FROM cash_registers WHERE id = ?1")
                    .bind(register_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return match status {
                None => Err(DbError::not_found("Cash register", register_id)),
                Some(_) => Err(DbError::conflict("cash register is not open")),
            };
        }

        let movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            cash_register_id: register_id.to_string(),
            movement_type,
            amount_cents,
            reason,
            performed_by_id: actor_id.to_string(),
            performed_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO cash_movements (
                id, cash_register_id, movement_type, amount_cents,
                reason, performed_by_id, performed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.cash_register_id)
        .bind(movement.movement_type)
        .bind(movement.amount_cents)
        .bind(&movement.reason)
        .bind(&movement.performed_by_id)
        .bind(movement.performed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            register_id = %register_id,
            ?movement_type,
            amount = %movement.amount(),
            "Cash movement recorded"
        );

        Ok(movement)
    }

    /// Closes the salon's open register, reconciling the counted balance.
    ///
    /// `expected = opening + total_cash + total_deposits - total_withdrawals`
    /// (card and PIX settle outside the physical drawer);
    /// `difference = closing - expected`. Once CLOSED the row is immutable;
    /// a second close finds no open register and fails.
    pub async fn close(
        &self,
        salon_id: &str,
        closing_balance_cents: i64,
        notes: Option<&str>,
        actor_id: &str,
    ) -> DbResult<CashRegister> {
        validate_non_negative_amount("closing_balance", closing_balance_cents)?;

        let mut tx = self.pool.begin().await?;

        let register = sqlx::query_as::<_, CashRegister>(
            "SELECT * FROM cash_registers WHERE salon_id = ?1 AND status = 'open'",
        )
        .bind(salon_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Open cash register", salon_id))?;

        let reconciliation = reconcile_drawer(
            register.opening_balance(),
            Money::from_cents(register.total_cash_cents),
            Money::from_cents(register.total_deposits_cents),
            Money::from_cents(register.total_withdrawals_cents),
            Money::from_cents(closing_balance_cents),
        );

        let now = Utc::now();
        let rows = sqlx::query(
            r#"
            UPDATE cash_registers SET
                status = 'closed',
                closing_balance_cents = ?2,
                expected_balance_cents = ?3,
                difference_cents = ?4,
                notes = ?5,
                closed_by_id = ?6,
                closed_at = ?7
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(&register.id)
        .bind(closing_balance_cents)
        .bind(reconciliation.expected.cents())
        .bind(reconciliation.difference.cents())
        .bind(notes)
        .bind(actor_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(DbError::conflict("cash register was closed concurrently"));
        }

        tx.commit().await?;

        info!(
            salon_id = %salon_id,
            register_id = %register.id,
            expected = %reconciliation.expected,
            difference = %reconciliation.difference,
            "Cash register closed"
        );

        Ok(CashRegister {
            status: RegisterStatus::Closed,
            closing_balance_cents: Some(closing_balance_cents),
            expected_balance_cents: Some(reconciliation.expected.cents()),
            difference_cents: Some(reconciliation.difference.cents()),
            notes: notes.map(str::to_string),
            closed_by_id: Some(actor_id.to_string()),
            closed_at: Some(now),
            ..register
        })
    }

    /// Lists CLOSED registers for a salon, most recent first.
    pub async fn history(&self, salon_id: &str, limit: u32) -> DbResult<Vec<CashRegister>> {
        let registers = sqlx::query_as::<_, CashRegister>(
            r#"
            SELECT * FROM cash_registers
            WHERE salon_id = ?1 AND status = 'closed'
            ORDER BY closed_at DESC
            LIMIT ?2
            "#,
        )
        .bind(salon_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(registers)
    }

    /// Lists a register's cash movements, oldest first.
    pub async fn movements(&self, register_id: &str) -> DbResult<Vec<CashMovement>> {
        let movements = sqlx::query_as::<_, CashMovement>(
            r#"
            SELECT * FROM cash_movements
            WHERE cash_register_id = ?1
            ORDER BY performed_at
            "#,
        )
        .bind(register_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    async fn insert_register(&self, register: &CashRegister) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cash_registers (
                id, salon_id, status, opening_balance_cents,
                total_sales_cents, total_cash_cents, total_card_cents, total_pix_cents,
                total_withdrawals_cents, total_deposits_cents,
                closing_balance_cents, expected_balance_cents, difference_cents,
                notes, opened_by_id, opened_at, closed_by_id, closed_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15, ?16, ?17, ?18
            )
            "#,
        )
        .bind(&register.id)
        .bind(&register.salon_id)
        .bind(register.status)
        .bind(register.opening_balance_cents)
        .bind(register.total_sales_cents)
        .bind(register.total_cash_cents)
        .bind(register.total_card_cents)
        .bind(register.total_pix_cents)
        .bind(register.total_withdrawals_cents)
        .bind(register.total_deposits_cents)
        .bind(register.closing_balance_cents)
        .bind(register.expected_balance_cents)
        .bind(register.difference_cents)
        .bind(&register.notes)
        .bind(&register.opened_by_id)
        .bind(register.opened_at)
        .bind(&register.closed_by_id)
        .bind(register.closed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Builds a fresh OPEN register with zeroed totals.
fn new_open_register(salon_id: &str, opening_balance_cents: i64, actor_id: &str) -> CashRegister {
    CashRegister {
        id: Uuid::new_v4().to_string(),
        salon_id: salon_id.to_string(),
        status: RegisterStatus::Open,
        opening_balance_cents,
        total_sales_cents: 0,
        total_cash_cents: 0,
        total_card_cents: 0,
        total_pix_cents: 0,
        total_withdrawals_cents: 0,
        total_deposits_cents: 0,
        closing_balance_cents: None,
        expected_balance_cents: None,
        difference_cents: None,
        notes: None,
        opened_by_id: actor_id.to_string(),
        opened_at: Utc::now(),
        closed_by_id: None,
        closed_at: None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    const SALON: &str = "salon-1";
    const ACTOR: &str = "user-1";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_and_current() {
        let db = test_db().await;
        let repo = db.registers();

        assert!(repo.current(SALON).await.unwrap().is_none());

        let register = repo.open(SALON, 20000, ACTOR).await.unwrap();
        assert_eq!(register.status, RegisterStatus::Open);
        assert_eq!(register.opening_balance_cents, 20000);
        assert_eq!(register.total_sales_cents, 0);

        let current = repo.current(SALON).await.unwrap().unwrap();
        assert_eq!(current.id, register.id);
    }

    #[tokio::test]
    async fn test_second_open_conflicts() {
        let db = test_db().await;
        let repo = db.registers();

        repo.open(SALON, 0, ACTOR).await.unwrap();
        let err = repo.open(SALON, 0, ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));

        // A different salon is unaffected
        repo.open("salon-2", 0, ACTOR).await.unwrap();
    }

    #[tokio::test]
    async fn test_open_rejects_negative_balance() {
        let db = test_db().await;
        let err = db.registers().open(SALON, -1, ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_round_trip_close() {
        // open(200) then immediately close(200) → expected 200, difference 0
        let db = test_db().await;
        let repo = db.registers();

        repo.open(SALON, 200, ACTOR).await.unwrap();
        let closed = repo.close(SALON, 200, None, ACTOR).await.unwrap();

        assert_eq!(closed.status, RegisterStatus::Closed);
        assert_eq!(closed.expected_balance_cents, Some(200));
        assert_eq!(closed.difference_cents, Some(0));
    }

    #[tokio::test]
    async fn test_full_drawer_scenario() {
        // open(100) → CASH 50 → PIX 30 → withdrawal 20 → close(130)
        let db = test_db().await;
        let repo = db.registers();

        let register = repo.open(SALON, 100, ACTOR).await.unwrap();
        repo.add_sale(SALON, "CASH", 50, Some(ACTOR)).await.unwrap();
        repo.add_sale(SALON, "PIX", 30, Some(ACTOR)).await.unwrap();
        repo.withdrawal(&register.id, 20, "test", ACTOR).await.unwrap();

        let current = repo.current(SALON).await.unwrap().unwrap();
        assert_eq!(current.total_sales_cents, 80);
        assert_eq!(current.total_cash_cents, 50);
        assert_eq!(current.total_pix_cents, 30);
        assert_eq!(current.total_card_cents, 0);
        assert_eq!(current.total_withdrawals_cents, 20);

        let closed = repo.close(SALON, 130, Some("fim de dia"), ACTOR).await.unwrap();
        // expected = 100 + 50 + 0 - 20 = 130 (PIX excluded from the drawer)
        assert_eq!(closed.expected_balance_cents, Some(130));
        assert_eq!(closed.difference_cents, Some(0));
        assert_eq!(closed.notes.as_deref(), Some("fim de dia"));
    }

    #[tokio::test]
    async fn test_add_sale_auto_opens() {
        let db = test_db().await;
        let repo = db.registers();

        let posting = repo.add_sale(SALON, "CARD", 4500, Some(ACTOR)).await.unwrap();
        let SalePosting::AutoOpened { register_id } = posting else {
            panic!("expected auto-open, got {posting:?}");
        };

        let register = repo.current(SALON).await.unwrap().unwrap();
        assert_eq!(register.id, register_id);
        assert_eq!(register.opening_balance_cents, 0);
        assert_eq!(register.opened_by_id, ACTOR);
        assert_eq!(register.total_sales_cents, 4500);
        assert_eq!(register.total_card_cents, 4500);
    }

    #[tokio::test]
    async fn test_add_sale_without_actor_is_unposted() {
        let db = test_db().await;
        let repo = db.registers();

        let posting = repo.add_sale(SALON, "CASH", 1000, None).await.unwrap();
        assert_eq!(posting, SalePosting::Unposted);
        assert!(repo.current(SALON).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unclassified_method_counts_sales_only() {
        let db = test_db().await;
        let repo = db.registers();

        repo.open(SALON, 0, ACTOR).await.unwrap();
        repo.add_sale(SALON, "VOUCHER", 700, None).await.unwrap();

        let register = repo.current(SALON).await.unwrap().unwrap();
        assert_eq!(register.total_sales_cents, 700);
        assert_eq!(
            register.total_cash_cents + register.total_card_cents + register.total_pix_cents,
            0
        );
    }

    #[tokio::test]
    async fn test_card_variants_share_bucket() {
        let db = test_db().await;
        let repo = db.registers();

        repo.open(SALON, 0, ACTOR).await.unwrap();
        repo.add_sale(SALON, "CREDIT_CARD", 100, None).await.unwrap();
        repo.add_sale(SALON, "DEBIT_CARD", 200, None).await.unwrap();

        let register = repo.current(SALON).await.unwrap().unwrap();
        assert_eq!(register.total_card_cents, 300);
    }

    #[tokio::test]
    async fn test_withdrawal_and_deposit_movements() {
        let db = test_db().await;
        let repo = db.registers();

        let register = repo.open(SALON, 10000, ACTOR).await.unwrap();
        repo.deposit(&register.id, 5000, "troco", ACTOR).await.unwrap();
        repo.withdrawal(&register.id, 2000, "sangria", ACTOR).await.unwrap();

        let current = repo.current(SALON).await.unwrap().unwrap();
        assert_eq!(current.total_deposits_cents, 5000);
        assert_eq!(current.total_withdrawals_cents, 2000);

        let movements = repo.movements(&register.id).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].movement_type, CashMovementType::Deposit);
        assert_eq!(movements[1].movement_type, CashMovementType::Withdrawal);
        assert_eq!(movements[1].reason, "sangria");
    }

    #[tokio::test]
    async fn test_movement_validation() {
        let db = test_db().await;
        let repo = db.registers();
        let register = repo.open(SALON, 0, ACTOR).await.unwrap();

        let err = repo.withdrawal(&register.id, 0, "x", ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo.withdrawal(&register.id, 100, "  ", ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_movement_against_missing_or_closed_register() {
        let db = test_db().await;
        let repo = db.registers();

        let err = repo.withdrawal("nope", 100, "x", ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let register = repo.open(SALON, 0, ACTOR).await.unwrap();
        repo.close(SALON, 0, None, ACTOR).await.unwrap();

        let err = repo.deposit(&register.id, 100, "late", ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_second_close_fails_and_preserves_record() {
        let db = test_db().await;
        let repo = db.registers();

        repo.open(SALON, 100, ACTOR).await.unwrap();
        repo.add_sale(SALON, "CASH", 50, None).await.unwrap();
        let closed = repo.close(SALON, 150, None, ACTOR).await.unwrap();

        let err = repo.close(SALON, 999, None, ACTOR).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The closed record is unchanged
        let history = repo.history(SALON, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, closed.id);
        assert_eq!(history[0].closing_balance_cents, Some(150));
        assert_eq!(history[0].difference_cents, Some(0));
    }

    #[tokio::test]
    async fn test_history_most_recent_first() {
        let db = test_db().await;
        let repo = db.registers();

        for day in 0..3 {
            repo.open(SALON, day, ACTOR).await.unwrap();
            repo.close(SALON, day, None, ACTOR).await.unwrap();
        }

        let history = repo.history(SALON, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].closed_at >= history[1].closed_at);
        assert_eq!(history[0].opening_balance_cents, 2);
    }

    #[tokio::test]
    async fn test_reopen_after_close_starts_fresh() {
        let db = test_db().await;
        let repo = db.registers();

        repo.open(SALON, 100, ACTOR).await.unwrap();
        repo.add_sale(SALON, "CASH", 500, None).await.unwrap();
        repo.close(SALON, 600, None, ACTOR).await.unwrap();

        let fresh = repo.open(SALON, 300, ACTOR).await.unwrap();
        assert_eq!(fresh.total_sales_cents, 0);
        assert_eq!(fresh.opening_balance_cents, 300);
    }
}
