//! # Stock Repository
//!
//! The per-location stock movement ledger.
//!
//! ## Ledger Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Every stock change is ledgered                             │
//! │                                                                         │
//! │  adjust() / transfer() / record_sale()                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ONE transaction:                                                       │
//! │    INSERT stock_movements row(s)   (append-only, signed delta)         │
//! │    UPDATE products counter(s)      (SET stock = stock + delta)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Invariant: counter == Σ deltas for that (product, location)           │
//! │                                                                         │
//! │  Transfers are TWO linked rows (-qty source, +qty destination) that    │
//! │  share a group_id, so the pair reconciles or reverses together.        │
//! │  Selling a KIT consumes its components the same way: one row per       │
//! │  component, one shared group_id.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! KIT availability is derived, never stored - see [`ledger_core::stock`].

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ledger_core::stock::{is_low_stock, kit_effective_stock, ComponentAvailability};
use ledger_core::timezone::date_range_utc;
use ledger_core::validation::{
    validate_nonzero_delta, validate_positive_quantity, validate_reason,
};
use ledger_core::{
    KitComponent, Product, ProductKind, StockLocation, StockMovement, StockMovementType,
};

// =============================================================================
// Query & View Types
// =============================================================================

/// Filters for the movement listing. All optional filters AND together.
#[derive(Debug, Clone)]
pub struct MovementQuery {
    pub salon_id: String,
    /// Calendar date in the business timezone; inclusive.
    pub from: Option<NaiveDate>,
    /// Calendar date in the business timezone; exclusive (half-open range).
    pub to: Option<NaiveDate>,
    pub location: Option<StockLocation>,
    pub product_id: Option<String>,
    pub movement_type: Option<StockMovementType>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl MovementQuery {
    /// A query with no filters, first page of 50.
    pub fn for_salon(salon_id: impl Into<String>) -> Self {
        MovementQuery {
            salon_id: salon_id.into(),
            from: None,
            to: None,
            location: None,
            product_id: None,
            movement_type: None,
            search: None,
            page: 1,
            page_size: 50,
        }
    }
}

/// One movement row joined with product and acting-user display names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockMovementView {
    pub id: String,
    pub salon_id: String,
    pub product_id: String,
    pub delta: i64,
    pub location_type: StockLocation,
    pub movement_type: StockMovementType,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub group_id: Option<String>,
    pub reason: Option<String>,
    pub created_by_user_id: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub product_name: String,
    pub created_by_name: Option<String>,
}

/// A page of movements plus the unpaginated total count.
#[derive(Debug, Clone, Serialize)]
pub struct MovementPage {
    pub rows: Vec<StockMovementView>,
    pub total: i64,
}

/// Effective stock state of one product at one location.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocationStock {
    /// Counter for SIMPLE products, derived for KIT products.
    pub effective: i64,
    pub minimum: i64,
    pub enabled: bool,
    pub low: bool,
}

/// One product in the stock summary.
#[derive(Debug, Clone, Serialize)]
pub struct StockSummaryRow {
    pub product_id: String,
    pub name: String,
    pub kind: ProductKind,
    pub unit: String,
    pub retail: LocationStock,
    pub internal: LocationStock,
}

/// A counter that disagrees with its ledger. Must be empty under the
/// transactional contract.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityMismatch {
    pub product_id: String,
    pub location: StockLocation,
    pub counter: i64,
    pub ledger_sum: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for stock ledger operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets a product scoped to a salon.
    pub async fn get_product(&self, salon_id: &str, product_id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ?1 AND salon_id = ?2",
        )
        .bind(product_id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", product_id))
    }

    /// Lists active products with effective stock per location.
    ///
    /// SIMPLE products report their materialized counters; KIT products
    /// report floor(min(component stock / component quantity)) and a kit
    /// without components reports 0 everywhere (fail-safe).
    ///
    /// `location` keeps products enabled at that location; `low_stock_only`
    /// keeps products flagged low there (or at either location when no
    /// location filter is given).
    pub async fn summary(
        &self,
        salon_id: &str,
        location: Option<StockLocation>,
        search: Option<&str>,
        low_stock_only: bool,
    ) -> DbResult<Vec<StockSummaryRow>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM products WHERE salon_id = ");
        qb.push_bind(salon_id);
        qb.push(" AND is_active = 1");
        if let Some(search) = search {
            qb.push(" AND name LIKE ")
                .push_bind(format!("%{}%", search.trim()));
        }
        qb.push(" ORDER BY name");

        let products: Vec<Product> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut rows = Vec::with_capacity(products.len());
        for product in &products {
            let (retail_stock, internal_stock) = match product.kind {
                ProductKind::Simple => (product.stock_retail, product.stock_internal),
                ProductKind::Kit => {
                    let components = self.kit_component_stock(&product.id).await?;
                    let retail: Vec<ComponentAvailability> = components
                        .iter()
                        .map(|c| ComponentAvailability {
                            stock: c.stock_retail,
                            quantity: c.quantity,
                        })
                        .collect();
                    let internal: Vec<ComponentAvailability> = components
                        .iter()
                        .map(|c| ComponentAvailability {
                            stock: c.stock_internal,
                            quantity: c.quantity,
                        })
                        .collect();
                    (kit_effective_stock(&retail), kit_effective_stock(&internal))
                }
            };

            let retail = LocationStock {
                effective: retail_stock,
                minimum: product.min_stock_retail,
                enabled: product.is_retail,
                low: is_low_stock(product.is_retail, retail_stock, product.min_stock_retail),
            };
            let internal = LocationStock {
                effective: internal_stock,
                minimum: product.min_stock_internal,
                enabled: product.is_backbar,
                low: is_low_stock(product.is_backbar, internal_stock, product.min_stock_internal),
            };

            let keep_location = match location {
                Some(StockLocation::Retail) => retail.enabled,
                Some(StockLocation::Internal) => internal.enabled,
                None => true,
            };
            let keep_low = !low_stock_only
                || match location {
                    Some(StockLocation::Retail) => retail.low,
                    Some(StockLocation::Internal) => internal.low,
                    None => retail.low || internal.low,
                };

            if keep_location && keep_low {
                rows.push(StockSummaryRow {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    kind: product.kind,
                    unit: product.unit.clone(),
                    retail,
                    internal,
                });
            }
        }

        Ok(rows)
    }

    /// Lists stock movements with filters pushed into SQL, joined with the
    /// acting user's display name, newest first, plus a total count.
    pub async fn movements(&self, query: &MovementQuery) -> DbResult<MovementPage> {
        let (from_utc, to_utc) = date_range_utc(query.from, query.to);

        let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(*) FROM stock_movements m \
             JOIN products p ON p.id = m.product_id",
        );
        push_movement_filters(&mut count_qb, query, from_utc, to_utc);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT m.*, p.name AS product_name, u.display_name AS created_by_name \
             FROM stock_movements m \
             JOIN products p ON p.id = m.product_id \
             LEFT JOIN users u ON u.id = m.created_by_user_id",
        );
        push_movement_filters(&mut qb, query, from_utc, to_utc);
        qb.push(" ORDER BY m.created_at DESC, m.id DESC");
        qb.push(" LIMIT ")
            .push_bind(query.page_size as i64)
            .push(" OFFSET ")
            .push_bind((query.page.max(1) as i64 - 1) * query.page_size as i64);

        let rows: Vec<StockMovementView> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(MovementPage { rows, total })
    }

    /// Compares every SIMPLE product's counters against the sum of its
    /// ledger deltas. Returns the mismatches; empty means the invariant
    /// holds. Intended for an external reconciliation check.
    pub async fn verify_integrity(&self, salon_id: &str) -> DbResult<Vec<IntegrityMismatch>> {
        let mut mismatches = Vec::new();

        for location in [StockLocation::Retail, StockLocation::Internal] {
            let counter_column = match location {
                StockLocation::Retail => "stock_retail",
                StockLocation::Internal => "stock_internal",
            };

            let sql = format!(
                "SELECT p.id AS product_id, p.{counter_column} AS counter, \
                        COALESCE(SUM(m.delta), 0) AS ledger_sum \
                 FROM products p \
                 LEFT JOIN stock_movements m \
                        ON m.product_id = p.id AND m.location_type = ?2 \
                 WHERE p.salon_id = ?1 AND p.kind = 'simple' \
                 GROUP BY p.id \
                 HAVING counter != ledger_sum"
            );

            let rows: Vec<(String, i64, i64)> = sqlx::query_as(&sql)
                .bind(salon_id)
                .bind(location)
                .fetch_all(&self.pool)
                .await?;

            for (product_id, counter, ledger_sum) in rows {
                warn!(
                    product_id = %product_id,
                    ?location,
                    counter,
                    ledger_sum,
                    "Stock counter disagrees with ledger"
                );
                mismatches.push(IntegrityMismatch {
                    product_id,
                    location,
                    counter,
                    ledger_sum,
                });
            }
        }

        Ok(mismatches)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Manually adjusts a SIMPLE product's stock at one location.
    ///
    /// The movement row and the counter update commit as one transaction.
    /// KIT products are rejected: their counters are not authoritative.
    pub async fn adjust(
        &self,
        salon_id: &str,
        product_id: &str,
        location: StockLocation,
        delta: i64,
        reason: &str,
        actor_id: &str,
    ) -> DbResult<StockMovement> {
        validate_nonzero_delta(delta)?;
        let reason = validate_reason(reason)?;

        let product = self.get_product(salon_id, product_id).await?;
        if product.kind == ProductKind::Kit {
            return Err(DbError::conflict(
                "kit products derive stock from components and cannot be adjusted directly",
            ));
        }

        let mut tx = self.pool.begin().await?;

        apply_counter_delta(&mut tx, product_id, location, delta).await?;

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.to_string(),
            product_id: product_id.to_string(),
            delta,
            location_type: location,
            movement_type: StockMovementType::Adjustment,
            reference_type: Some("manual".to_string()),
            reference_id: None,
            group_id: None,
            reason: Some(reason),
            created_by_user_id: Some(actor_id.to_string()),
            created_at: Utc::now(),
        };
        insert_movement(&mut tx, &movement).await?;

        tx.commit().await?;

        debug!(
            product_id = %product_id,
            ?location,
            delta,
            "Stock adjusted"
        );

        Ok(movement)
    }

    /// Transfers quantity between the two locations of a SIMPLE product.
    ///
    /// Modeled as two linked ledger rows (-qty at source, +qty at
    /// destination) sharing a group_id, committed with both counter
    /// updates in one transaction.
    pub async fn transfer(
        &self,
        salon_id: &str,
        product_id: &str,
        quantity: i64,
        from: StockLocation,
        to: StockLocation,
        actor_id: &str,
    ) -> DbResult<(StockMovement, StockMovement)> {
        validate_positive_quantity("quantity", quantity)?;
        if from == to {
            return Err(DbError::conflict(
                "transfer source and destination are the same location",
            ));
        }

        let product = self.get_product(salon_id, product_id).await?;
        if product.kind == ProductKind::Kit {
            return Err(DbError::conflict(
                "kit products derive stock from components and cannot be transferred",
            ));
        }

        let group_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let leg = |location: StockLocation, delta: i64| StockMovement {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.to_string(),
            product_id: product_id.to_string(),
            delta,
            location_type: location,
            movement_type: StockMovementType::Transfer,
            reference_type: Some("transfer".to_string()),
            reference_id: None,
            group_id: Some(group_id.clone()),
            reason: None,
            created_by_user_id: Some(actor_id.to_string()),
            created_at: now,
        };
        let out = leg(from, -quantity);
        let into = leg(to, quantity);

        let mut tx = self.pool.begin().await?;

        apply_counter_delta(&mut tx, product_id, from, -quantity).await?;
        apply_counter_delta(&mut tx, product_id, to, quantity).await?;
        insert_movement(&mut tx, &out).await?;
        insert_movement(&mut tx, &into).await?;

        tx.commit().await?;

        debug!(
            product_id = %product_id,
            quantity,
            ?from,
            ?to,
            group_id = %group_id,
            "Stock transferred"
        );

        Ok((out, into))
    }

    /// Records stock consumption for a finalized sale.
    ///
    /// Called by the checkout orchestrator. A SIMPLE product yields one
    /// -qty row; a KIT product yields one row per component, each
    /// -(qty x component quantity), sharing a group_id. Returns the
    /// inserted movements.
    pub async fn record_sale(
        &self,
        salon_id: &str,
        product_id: &str,
        quantity: i64,
        location: StockLocation,
        command_id: &str,
        actor_id: Option<&str>,
    ) -> DbResult<Vec<StockMovement>> {
        validate_positive_quantity("quantity", quantity)?;

        let product = self.get_product(salon_id, product_id).await?;
        let now = Utc::now();

        let movement = |product_id: String,
                        delta: i64,
                        movement_type: StockMovementType,
                        group_id: Option<String>| StockMovement {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.to_string(),
            product_id,
            delta,
            location_type: location,
            movement_type,
            reference_type: Some("command".to_string()),
            reference_id: Some(command_id.to_string()),
            group_id,
            reason: None,
            created_by_user_id: actor_id.map(str::to_string),
            created_at: now,
        };

        let movements = match product.kind {
            ProductKind::Simple => {
                vec![movement(
                    product.id.clone(),
                    -quantity,
                    StockMovementType::Sale,
                    None,
                )]
            }
            ProductKind::Kit => {
                let components = self.kit_components(&product.id).await?;
                if components.is_empty() {
                    // Ill-defined kit: nothing to consume. Logged because a
                    // sale of it went through with no stock effect.
                    warn!(
                        product_id = %product.id,
                        command_id = %command_id,
                        "Kit sold with no declared components: no stock consumed"
                    );
                    return Ok(Vec::new());
                }
                let group_id = Uuid::new_v4().to_string();
                components
                    .iter()
                    .map(|c| {
                        movement(
                            c.component_product_id.clone(),
                            -(quantity * c.quantity),
                            StockMovementType::KitConsumption,
                            Some(group_id.clone()),
                        )
                    })
                    .collect()
            }
        };

        let mut tx = self.pool.begin().await?;

        for m in &movements {
            apply_counter_delta(&mut tx, &m.product_id, location, m.delta).await?;
            insert_movement(&mut tx, m).await?;
        }

        tx.commit().await?;

        debug!(
            product_id = %product_id,
            quantity,
            ?location,
            command_id = %command_id,
            legs = movements.len(),
            "Sale consumption ledgered"
        );

        Ok(movements)
    }

    // -------------------------------------------------------------------------
    // Catalog plumbing (seed & tests; definitions come from the catalog)
    // -------------------------------------------------------------------------

    /// Inserts a product row.
    pub async fn insert_product(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, salon_id, name, kind, is_retail, is_backbar,
                stock_retail, stock_internal, min_stock_retail, min_stock_internal,
                cost_price_cents, sale_price_cents, unit, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&product.id)
        .bind(&product.salon_id)
        .bind(&product.name)
        .bind(product.kind)
        .bind(product.is_retail)
        .bind(product.is_backbar)
        .bind(product.stock_retail)
        .bind(product.stock_internal)
        .bind(product.min_stock_retail)
        .bind(product.min_stock_internal)
        .bind(product.cost_price_cents)
        .bind(product.sale_price_cents)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Links a component to a kit product.
    pub async fn add_kit_component(
        &self,
        kit_product_id: &str,
        component_product_id: &str,
        quantity: i64,
    ) -> DbResult<KitComponent> {
        validate_positive_quantity("quantity", quantity)?;

        let component = KitComponent {
            id: Uuid::new_v4().to_string(),
            kit_product_id: kit_product_id.to_string(),
            component_product_id: component_product_id.to_string(),
            quantity,
        };

        sqlx::query(
            r#"
            INSERT INTO kit_components (id, kit_product_id, component_product_id, quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&component.id)
        .bind(&component.kit_product_id)
        .bind(&component.component_product_id)
        .bind(component.quantity)
        .execute(&self.pool)
        .await?;

        Ok(component)
    }

    /// Upserts a user's display name (mirror of the external auth identity).
    pub async fn upsert_user(&self, id: &str, display_name: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name) VALUES (?1, ?2)
            ON CONFLICT (id) DO UPDATE SET display_name = excluded.display_name
            "#,
        )
        .bind(id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn kit_components(&self, kit_product_id: &str) -> DbResult<Vec<KitComponent>> {
        let components = sqlx::query_as::<_, KitComponent>(
            "SELECT * FROM kit_components WHERE kit_product_id = ?1",
        )
        .bind(kit_product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(components)
    }

    /// Kit components joined with the component product's counters.
    async fn kit_component_stock(&self, kit_product_id: &str) -> DbResult<Vec<ComponentStock>> {
        let rows = sqlx::query_as::<_, ComponentStock>(
            r#"
            SELECT k.quantity, p.stock_retail, p.stock_internal
            FROM kit_components k
            JOIN products p ON p.id = k.component_product_id
            WHERE k.kit_product_id = ?1
            "#,
        )
        .bind(kit_product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ComponentStock {
    quantity: i64,
    stock_retail: i64,
    stock_internal: i64,
}

/// Applies a signed delta to the materialized counter of one location.
/// Must run inside the same transaction as the movement insert.
async fn apply_counter_delta(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    product_id: &str,
    location: StockLocation,
    delta: i64,
) -> DbResult<()> {
    let column = match location {
        StockLocation::Retail => "stock_retail",
        StockLocation::Internal => "stock_internal",
    };
    let sql = format!(
        "UPDATE products SET {0} = {0} + ?2, updated_at = ?3 WHERE id = ?1",
        column
    );

    let rows = sqlx::query(&sql)
        .bind(product_id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(DbError::not_found("Product", product_id));
    }
    Ok(())
}

async fn insert_movement(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    movement: &StockMovement,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, salon_id, product_id, delta, location_type, movement_type,
            reference_type, reference_id, group_id, reason,
            created_by_user_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.salon_id)
    .bind(&movement.product_id)
    .bind(movement.delta)
    .bind(movement.location_type)
    .bind(movement.movement_type)
    .bind(&movement.reference_type)
    .bind(&movement.reference_id)
    .bind(&movement.group_id)
    .bind(&movement.reason)
    .bind(&movement.created_by_user_id)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Appends the shared WHERE clauses of the movement listing and its count.
fn push_movement_filters(
    qb: &mut QueryBuilder<Sqlite>,
    query: &MovementQuery,
    from_utc: Option<chrono::DateTime<Utc>>,
    to_utc: Option<chrono::DateTime<Utc>>,
) {
    qb.push(" WHERE m.salon_id = ").push_bind(query.salon_id.clone());
    if let Some(from) = from_utc {
        qb.push(" AND m.created_at >= ").push_bind(from);
    }
    if let Some(to) = to_utc {
        qb.push(" AND m.created_at < ").push_bind(to);
    }
    if let Some(location) = query.location {
        qb.push(" AND m.location_type = ").push_bind(location);
    }
    if let Some(product_id) = &query.product_id {
        qb.push(" AND m.product_id = ").push_bind(product_id.clone());
    }
    if let Some(movement_type) = query.movement_type {
        qb.push(" AND m.movement_type = ").push_bind(movement_type);
    }
    if let Some(search) = &query.search {
        qb.push(" AND p.name LIKE ")
            .push_bind(format!("%{}%", search.trim()));
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

    fn product(id: &str, name: &str, kind: ProductKind) -> Product {
        Product {
            id: id.to_string(),
            salon_id: SALON.to_string(),
            name: name.to_string(),
            kind,
            is_retail: true,
            is_backbar: true,
            stock_retail: 0,
            stock_internal: 0,
            min_stock_retail: 0,
            min_stock_internal: 0,
            cost_price_cents: 1000,
            sale_price_cents: 2500,
            unit: "un".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn seed_simple(repo: &StockRepository, id: &str, name: &str) {
        repo.insert_product(&product(id, name, ProductKind::Simple))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_adjust_updates_counter_and_ledger() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;

        repo.adjust(SALON, "p1", StockLocation::Retail, 10, "initial count", ACTOR)
            .await
            .unwrap();
        repo.adjust(SALON, "p1", StockLocation::Retail, -3, "breakage", ACTOR)
            .await
            .unwrap();

        let p = repo.get_product(SALON, "p1").await.unwrap();
        assert_eq!(p.stock_retail, 7);
        assert_eq!(p.stock_internal, 0);

        assert!(repo.verify_integrity(SALON).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_validation_and_kit_rejection() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;
        repo.insert_product(&product("k1", "Kit", ProductKind::Kit))
            .await
            .unwrap();

        let err = repo
            .adjust(SALON, "p1", StockLocation::Retail, 0, "noop", ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo
            .adjust(SALON, "p1", StockLocation::Retail, 5, "", ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo
            .adjust(SALON, "k1", StockLocation::Retail, 5, "no", ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));

        let err = repo
            .adjust(SALON, "missing", StockLocation::Retail, 5, "no", ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mutations_accept_unmirrored_actor() {
        // Actor ids come from the external auth layer. A missing users row
        // must never block a ledger write; it only blanks the display name
        // in listings.
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;

        repo.adjust(SALON, "p1", StockLocation::Retail, 5, "count", "ghost-actor")
            .await
            .unwrap();
        repo.record_sale(SALON, "p1", 1, StockLocation::Retail, "cmd-1", Some("ghost-actor"))
            .await
            .unwrap();

        let page = repo.movements(&MovementQuery::for_salon(SALON)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(
            page.rows[0].created_by_user_id.as_deref(),
            Some("ghost-actor")
        );
        assert!(page.rows[0].created_by_name.is_none());
    }

    #[tokio::test]
    async fn test_adjust_is_tenant_scoped() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;

        let err = repo
            .adjust("other-salon", "p1", StockLocation::Retail, 5, "x", ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_transfer_two_linked_legs() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;
        repo.adjust(SALON, "p1", StockLocation::Retail, 10, "count", ACTOR)
            .await
            .unwrap();

        let (out, into) = repo
            .transfer(SALON, "p1", 4, StockLocation::Retail, StockLocation::Internal, ACTOR)
            .await
            .unwrap();

        assert_eq!(out.delta, -4);
        assert_eq!(into.delta, 4);
        assert_eq!(out.group_id, into.group_id);
        assert!(out.group_id.is_some());

        let p = repo.get_product(SALON, "p1").await.unwrap();
        assert_eq!(p.stock_retail, 6);
        assert_eq!(p.stock_internal, 4);

        assert!(repo.verify_integrity(SALON).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_same_location_rejected() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;

        let err = repo
            .transfer(SALON, "p1", 1, StockLocation::Retail, StockLocation::Retail, ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_record_sale_simple() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;
        repo.adjust(SALON, "p1", StockLocation::Retail, 10, "count", ACTOR)
            .await
            .unwrap();

        let movements = repo
            .record_sale(SALON, "p1", 2, StockLocation::Retail, "cmd-1", Some(ACTOR))
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].delta, -2);
        assert_eq!(movements[0].movement_type, StockMovementType::Sale);
        assert_eq!(movements[0].reference_id.as_deref(), Some("cmd-1"));

        let p = repo.get_product(SALON, "p1").await.unwrap();
        assert_eq!(p.stock_retail, 8);
    }

    #[tokio::test]
    async fn test_record_sale_kit_consumes_components() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "a", "Comp A").await;
        seed_simple(&repo, "b", "Comp B").await;
        repo.insert_product(&product("k1", "Kit", ProductKind::Kit))
            .await
            .unwrap();
        repo.add_kit_component("k1", "a", 2).await.unwrap();
        repo.add_kit_component("k1", "b", 1).await.unwrap();
        repo.adjust(SALON, "a", StockLocation::Internal, 10, "count", ACTOR)
            .await
            .unwrap();
        repo.adjust(SALON, "b", StockLocation::Internal, 3, "count", ACTOR)
            .await
            .unwrap();

        let movements = repo
            .record_sale(SALON, "k1", 1, StockLocation::Internal, "cmd-2", Some(ACTOR))
            .await
            .unwrap();
        assert_eq!(movements.len(), 2);
        assert!(movements.iter().all(|m| m.group_id == movements[0].group_id));
        assert!(movements
            .iter()
            .all(|m| m.movement_type == StockMovementType::KitConsumption));

        let a = repo.get_product(SALON, "a").await.unwrap();
        let b = repo.get_product(SALON, "b").await.unwrap();
        assert_eq!(a.stock_internal, 8); // 10 - 1x2
        assert_eq!(b.stock_internal, 2); // 3 - 1x1

        assert!(repo.verify_integrity(SALON).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_sale_empty_kit_consumes_nothing() {
        let db = test_db().await;
        let repo = db.stock();
        repo.insert_product(&product("k1", "Kit", ProductKind::Kit))
            .await
            .unwrap();

        let movements = repo
            .record_sale(SALON, "k1", 1, StockLocation::Retail, "cmd-3", None)
            .await
            .unwrap();
        assert!(movements.is_empty());
    }

    #[tokio::test]
    async fn test_summary_kit_derivation() {
        // KIT with A(quantity 2, internal 10) and B(quantity 1, internal 3)
        // → derived internal effective stock min(floor(10/2), 3) = 3
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "a", "Comp A").await;
        seed_simple(&repo, "b", "Comp B").await;
        repo.insert_product(&product("k1", "Kit Hidratacao", ProductKind::Kit))
            .await
            .unwrap();
        repo.add_kit_component("k1", "a", 2).await.unwrap();
        repo.add_kit_component("k1", "b", 1).await.unwrap();
        repo.adjust(SALON, "a", StockLocation::Internal, 10, "count", ACTOR)
            .await
            .unwrap();
        repo.adjust(SALON, "b", StockLocation::Internal, 3, "count", ACTOR)
            .await
            .unwrap();

        let rows = repo.summary(SALON, None, Some("Kit"), false).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].internal.effective, 3);
        assert_eq!(rows[0].retail.effective, 0);
    }

    #[tokio::test]
    async fn test_summary_empty_kit_is_zero() {
        let db = test_db().await;
        let repo = db.stock();
        repo.insert_product(&product("k1", "Kit Vazio", ProductKind::Kit))
            .await
            .unwrap();

        let rows = repo.summary(SALON, None, None, false).await.unwrap();
        assert_eq!(rows[0].retail.effective, 0);
        assert_eq!(rows[0].internal.effective, 0);
    }

    #[tokio::test]
    async fn test_summary_low_stock_per_location() {
        let db = test_db().await;
        let repo = db.stock();

        let mut p = product("p1", "Shampoo", ProductKind::Simple);
        p.min_stock_retail = 5;
        p.min_stock_internal = 5;
        p.is_backbar = false; // disabled internally
        repo.insert_product(&p).await.unwrap();
        repo.adjust(SALON, "p1", StockLocation::Retail, 3, "count", ACTOR)
            .await
            .unwrap();

        let rows = repo.summary(SALON, None, None, true).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].retail.low);
        // internal is at 0 ≤ 5 but the location is disabled, so never low
        assert!(!rows[0].internal.low);

        // low-stock filter scoped to a location the product is not low at
        repo.adjust(SALON, "p1", StockLocation::Retail, 10, "restock", ACTOR)
            .await
            .unwrap();
        let rows = repo.summary(SALON, None, None, true).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_movements_filters_and_pagination() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo Nutritivo").await;
        seed_simple(&repo, "p2", "Condicionador").await;
        repo.upsert_user(ACTOR, "Maria Silva").await.unwrap();

        repo.adjust(SALON, "p1", StockLocation::Retail, 10, "count", ACTOR)
            .await
            .unwrap();
        repo.adjust(SALON, "p2", StockLocation::Internal, 5, "count", ACTOR)
            .await
            .unwrap();
        repo.record_sale(SALON, "p1", 1, StockLocation::Retail, "cmd-1", Some(ACTOR))
            .await
            .unwrap();

        // No filters: everything
        let page = repo.movements(&MovementQuery::for_salon(SALON)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.rows[0].created_by_name.as_deref(), Some("Maria Silva"));

        // Product filter
        let mut q = MovementQuery::for_salon(SALON);
        q.product_id = Some("p2".to_string());
        let page = repo.movements(&q).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].product_name, "Condicionador");

        // Movement-type filter
        let mut q = MovementQuery::for_salon(SALON);
        q.movement_type = Some(StockMovementType::Sale);
        let page = repo.movements(&q).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].delta, -1);

        // Location filter
        let mut q = MovementQuery::for_salon(SALON);
        q.location = Some(StockLocation::Internal);
        let page = repo.movements(&q).await.unwrap();
        assert_eq!(page.total, 1);

        // Name search
        let mut q = MovementQuery::for_salon(SALON);
        q.search = Some("Nutritivo".to_string());
        let page = repo.movements(&q).await.unwrap();
        assert_eq!(page.total, 2);

        // Pagination: page_size 2 → page 1 has 2 rows, page 2 has 1
        let mut q = MovementQuery::for_salon(SALON);
        q.page_size = 2;
        let page1 = repo.movements(&q).await.unwrap();
        assert_eq!(page1.rows.len(), 2);
        assert_eq!(page1.total, 3);
        q.page = 2;
        let page2 = repo.movements(&q).await.unwrap();
        assert_eq!(page2.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_movements_date_range_half_open() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;
        repo.adjust(SALON, "p1", StockLocation::Retail, 1, "count", ACTOR)
            .await
            .unwrap();

        let today_sp = Utc::now()
            .with_timezone(&ledger_core::timezone::BUSINESS_TZ)
            .date_naive();

        // [today, tomorrow) contains the movement
        let mut q = MovementQuery::for_salon(SALON);
        q.from = Some(today_sp);
        q.to = Some(today_sp + chrono::Duration::days(1));
        assert_eq!(repo.movements(&q).await.unwrap().total, 1);

        // [tomorrow, ...) excludes it: `to` is exclusive, `from` inclusive
        let mut q = MovementQuery::for_salon(SALON);
        q.from = Some(today_sp + chrono::Duration::days(1));
        assert_eq!(repo.movements(&q).await.unwrap().total, 0);

        // [..., today) excludes it as well
        let mut q = MovementQuery::for_salon(SALON);
        q.to = Some(today_sp);
        assert_eq!(repo.movements(&q).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_verify_integrity_detects_drift() {
        let db = test_db().await;
        let repo = db.stock();
        seed_simple(&repo, "p1", "Shampoo").await;
        repo.adjust(SALON, "p1", StockLocation::Retail, 10, "count", ACTOR)
            .await
            .unwrap();

        // Corrupt the counter behind the ledger's back
        sqlx::query("UPDATE products SET stock_retail = 99 WHERE id = 'p1'")
            .execute(db.pool())
            .await
            .unwrap();

        let mismatches = repo.verify_integrity(SALON).await.unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].counter, 99);
        assert_eq!(mismatches[0].ledger_sum, 10);
        assert_eq!(mismatches[0].location, StockLocation::Retail);
    }
}
