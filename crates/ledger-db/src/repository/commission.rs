//! # Commission Repository
//!
//! Per-line-item commission records and their payment lifecycle.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Commission Lifecycle                                  │
//! │                                                                         │
//! │  create_from_command_item()                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   PENDING ──── pay() / pay_for_professional() ────▶ PAID  (terminal)   │
//! │       │                                                                 │
//! │       └─────── cancel_by_command() ───────────────▶ CANCELLED          │
//! │                (command voided)                      (terminal)         │
//! │                                                                         │
//! │  PAID rows are immutable history: cancelling a command never claws     │
//! │  back money already paid out.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The value is frozen at creation: `round_half_up(item_value x rate)`.
//! Later price or rate edits never rewrite an existing commission.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ledger_core::timezone::date_range_utc;
use ledger_core::validation::{validate_positive_amount, validate_rate_bps, validate_reason};
use ledger_core::{Commission, CommissionStatus, Money, ValidationError};

// =============================================================================
// View Types
// =============================================================================

/// Outcome of a batch payment.
#[derive(Debug, Clone, Serialize)]
pub struct PayReceipt {
    /// Number of commissions transitioned to PAID.
    pub paid: usize,
    /// Sum of their values.
    pub total_cents: i64,
}

/// Pending/paid counts and sums for a salon (optionally one professional).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommissionSummary {
    pub pending_count: i64,
    pub pending_cents: i64,
    pub paid_count: i64,
    pub paid_cents: i64,
}

/// Filters for the commission listing.
#[derive(Debug, Clone, Default)]
pub struct CommissionQuery {
    pub professional_id: Option<String>,
    pub status: Option<CommissionStatus>,
    /// Creation-date window, calendar dates in the business timezone,
    /// half-open `[from, to)`.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for commission operations.
#[derive(Debug, Clone)]
pub struct CommissionRepository {
    pool: SqlitePool,
}

impl CommissionRepository {
    /// Creates a new CommissionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CommissionRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Creation & Cancellation
    // -------------------------------------------------------------------------

    /// Creates one PENDING commission for a sold line item.
    ///
    /// `commission_value = round_half_up(item_value x rate_bps / 10_000)`,
    /// frozen at creation.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_from_command_item(
        &self,
        salon_id: &str,
        command_id: &str,
        command_item_id: &str,
        professional_id: &str,
        item_description: &str,
        item_value_cents: i64,
        rate_bps: i64,
    ) -> DbResult<Commission> {
        validate_positive_amount("item_value", item_value_cents)?;
        validate_rate_bps(rate_bps)?;
        // Same rules as reason text, reported under the right field name.
        let item_description = validate_reason(item_description).map_err(|e| match e {
            ValidationError::TooLong { max, .. } => ValidationError::TooLong {
                field: "item_description".to_string(),
                max,
            },
            _ => ValidationError::Required {
                field: "item_description".to_string(),
            },
        })?;

        let commission_value =
            Money::from_cents(item_value_cents).apply_rate_bps(rate_bps as u32);

        let commission = Commission {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.to_string(),
            command_id: command_id.to_string(),
            command_item_id: command_item_id.to_string(),
            professional_id: professional_id.to_string(),
            item_description,
            item_value_cents,
            commission_rate_bps: rate_bps,
            commission_value_cents: commission_value.cents(),
            status: CommissionStatus::Pending,
            paid_at: None,
            paid_by_id: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO commissions (
                id, salon_id, command_id, command_item_id, professional_id,
                item_description, item_value_cents, commission_rate_bps,
                commission_value_cents, status, paid_at, paid_by_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&commission.id)
        .bind(&commission.salon_id)
        .bind(&commission.command_id)
        .bind(&commission.command_item_id)
        .bind(&commission.professional_id)
        .bind(&commission.item_description)
        .bind(commission.item_value_cents)
        .bind(commission.commission_rate_bps)
        .bind(commission.commission_value_cents)
        .bind(commission.status)
        .bind(commission.paid_at)
        .bind(&commission.paid_by_id)
        .bind(commission.created_at)
        .execute(&self.pool)
        .await?;

        debug!(
            commission_id = %commission.id,
            professional_id = %professional_id,
            value_cents = commission.commission_value_cents,
            "Commission created"
        );

        Ok(commission)
    }

    /// Cancels every PENDING commission of a voided command.
    ///
    /// PAID rows are never touched. Returns the number cancelled.
    pub async fn cancel_by_command(&self, command_id: &str) -> DbResult<u64> {
        let cancelled = sqlx::query(
            "UPDATE commissions SET status = 'cancelled' \
             WHERE command_id = ?1 AND status = 'pending'",
        )
        .bind(command_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if cancelled > 0 {
            info!(command_id = %command_id, cancelled, "Commissions cancelled");
        }

        Ok(cancelled)
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    /// Pays a batch of commissions by id.
    ///
    /// Only ids that belong to the salon AND are still PENDING are paid;
    /// missing or non-PENDING ids are silently excluded. Errs with a
    /// Validation error iff the eligible set is empty. All stamps commit
    /// in one transaction.
    pub async fn pay(
        &self,
        salon_id: &str,
        commission_ids: &[String],
        payer_id: &str,
    ) -> DbResult<PayReceipt> {
        if commission_ids.is_empty() {
            return Err(DbError::Validation(ValidationError::NoEligibleItems {
                context: "pay commissions".to_string(),
            }));
        }

        let mut tx = self.pool.begin().await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, commission_value_cents FROM commissions \
             WHERE status = 'pending' AND salon_id = ",
        );
        qb.push_bind(salon_id);
        qb.push(" AND id IN (");
        let mut separated = qb.separated(", ");
        for id in commission_ids {
            separated.push_bind(id.clone());
        }
        qb.push(")");

        let eligible: Vec<(String, i64)> = qb.build_query_as().fetch_all(&mut *tx).await?;

        let receipt = pay_rows(&mut tx, &eligible, payer_id).await?;
        tx.commit().await?;

        info!(
            salon_id = %salon_id,
            paid = receipt.paid,
            total_cents = receipt.total_cents,
            "Commissions paid"
        );

        Ok(receipt)
    }

    /// Pays every PENDING commission of one professional, optionally limited
    /// to a creation-date window.
    pub async fn pay_for_professional(
        &self,
        salon_id: &str,
        professional_id: &str,
        payer_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DbResult<PayReceipt> {
        let (from_utc, to_utc) = date_range_utc(from, to);

        let mut tx = self.pool.begin().await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, commission_value_cents FROM commissions \
             WHERE status = 'pending' AND salon_id = ",
        );
        qb.push_bind(salon_id);
        qb.push(" AND professional_id = ").push_bind(professional_id);
        if let Some(from) = from_utc {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = to_utc {
            qb.push(" AND created_at < ").push_bind(to);
        }

        let eligible: Vec<(String, i64)> = qb.build_query_as().fetch_all(&mut *tx).await?;

        let receipt = pay_rows(&mut tx, &eligible, payer_id).await?;
        tx.commit().await?;

        info!(
            salon_id = %salon_id,
            professional_id = %professional_id,
            paid = receipt.paid,
            total_cents = receipt.total_cents,
            "Professional commissions paid"
        );

        Ok(receipt)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets a commission by id, scoped to a salon.
    pub async fn get(&self, salon_id: &str, commission_id: &str) -> DbResult<Commission> {
        sqlx::query_as::<_, Commission>(
            "SELECT * FROM commissions WHERE id = ?1 AND salon_id = ?2",
        )
        .bind(commission_id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Commission", commission_id))
    }

    /// Lists commissions for a salon, newest first.
    pub async fn list(&self, salon_id: &str, query: &CommissionQuery) -> DbResult<Vec<Commission>> {
        let (from_utc, to_utc) = date_range_utc(query.from, query.to);

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM commissions WHERE salon_id = ");
        qb.push_bind(salon_id);
        if let Some(professional_id) = &query.professional_id {
            qb.push(" AND professional_id = ").push_bind(professional_id.clone());
        }
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(from) = from_utc {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = to_utc {
            qb.push(" AND created_at < ").push_bind(to);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let commissions = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(commissions)
    }

    /// Pending/paid counts and value sums.
    pub async fn summary(
        &self,
        salon_id: &str,
        professional_id: Option<&str>,
    ) -> DbResult<CommissionSummary> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT \
               COUNT(CASE WHEN status = 'pending' THEN 1 END) AS pending_count, \
               COALESCE(SUM(CASE WHEN status = 'pending' THEN commission_value_cents END), 0) AS pending_cents, \
               COUNT(CASE WHEN status = 'paid' THEN 1 END) AS paid_count, \
               COALESCE(SUM(CASE WHEN status = 'paid' THEN commission_value_cents END), 0) AS paid_cents \
             FROM commissions WHERE salon_id = ",
        );
        qb.push_bind(salon_id);
        if let Some(professional_id) = professional_id {
            qb.push(" AND professional_id = ").push_bind(professional_id);
        }

        let summary = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(summary)
    }
}

/// Stamps the eligible rows PAID inside the caller's transaction.
///
/// The eligible set was selected on the same connection, so the guarded
/// UPDATE transitions exactly those rows.
async fn pay_rows(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    eligible: &[(String, i64)],
    payer_id: &str,
) -> DbResult<PayReceipt> {
    if eligible.is_empty() {
        return Err(DbError::Validation(ValidationError::NoEligibleItems {
            context: "pay commissions".to_string(),
        }));
    }

    let paid_at = Utc::now();
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE commissions SET status = 'paid', paid_at = ");
    qb.push_bind(paid_at);
    qb.push(", paid_by_id = ").push_bind(payer_id);
    qb.push(" WHERE status = 'pending' AND id IN (");
    let mut separated = qb.separated(", ");
    for (id, _) in eligible {
        separated.push_bind(id.clone());
    }
    qb.push(")");

    qb.build().execute(&mut **tx).await?;

    Ok(PayReceipt {
        paid: eligible.len(),
        total_cents: eligible.iter().map(|(_, cents)| cents).sum(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
