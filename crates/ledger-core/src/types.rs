//! # Domain Types
//!
//! Core domain types for the salon ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CashRegister   │   │  StockMovement  │   │   Commission    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  status         │   │  delta (signed) │   │  status         │       │
//! │  │  running totals │   │  location_type  │   │  value_cents    │       │
//! │  └────────┬────────┘   └────────┬────────┘   └─────────────────┘       │
//! │           │                     │                                       │
//! │  ┌────────▼────────┐   ┌────────▼────────┐                             │
//! │  │  CashMovement   │   │    Product      │                             │
//! │  │  (append-only)  │   │  KitComponent   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has an `id`: UUID v4 stored as TEXT - immutable, used for
//! database relations. `salon_id` is the tenant discriminator on every
//! tenant-owned row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Register Status
// =============================================================================

/// Lifecycle status of a cash register (drawer session).
///
/// A salon has at most one OPEN register at any instant. CLOSED registers
/// are archival: a new `open()` starts a fresh row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    /// Drawer is open and accepting sales and cash movements.
    Open,
    /// Drawer has been reconciled and closed. Immutable.
    Closed,
}

// =============================================================================
// Cash Movement Type
// =============================================================================

/// Manual cash adjustment direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum CashMovementType {
    /// Cash taken out of the drawer.
    Withdrawal,
    /// Cash put into the drawer.
    Deposit,
}

// =============================================================================
// Product Kind & Stock Location
// =============================================================================

/// Whether a product carries its own stock or derives it from components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Stock counters on the product row are authoritative.
    Simple,
    /// Availability is derived from component stock (see [`crate::stock`]).
    Kit,
}

/// Stock location within a salon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum StockLocation {
    /// Shelf stock sold to customers.
    Retail,
    /// Backbar stock consumed internally during services.
    Internal,
}

// =============================================================================
// Stock Movement Type
// =============================================================================

/// What caused a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockMovementType {
    /// Consumption by a finalized sale.
    Sale,
    /// Manual correction (count fix, loss, found stock).
    Adjustment,
    /// One leg of an inter-location transfer. Legs share a `group_id`.
    Transfer,
    /// Component consumption when a kit is sold. Legs share a `group_id`.
    KitConsumption,
}

// =============================================================================
// Commission Status
// =============================================================================

/// Commission lifecycle: PENDING → PAID or PENDING → CANCELLED.
///
/// PAID and CANCELLED are terminal. Paid money is immutable history; a
/// voided command never retroactively alters a paid commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Pending,
    Paid,
    Cancelled,
}

// =============================================================================
// Cash Register
// =============================================================================

/// One drawer session for a salon, bounded by open/close.
///
/// Running totals are maintained by atomic in-database increments, never
/// read-modify-write. The closing fields stay NULL until `close()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashRegister {
    pub id: String,
    pub salon_id: String,
    pub status: RegisterStatus,
    /// Cash counted into the drawer at opening.
    pub opening_balance_cents: i64,
    /// Sum of all posted sales regardless of payment method.
    pub total_sales_cents: i64,
    pub total_cash_cents: i64,
    pub total_card_cents: i64,
    pub total_pix_cents: i64,
    pub total_withdrawals_cents: i64,
    pub total_deposits_cents: i64,
    /// Cash counted at closing. NULL while open.
    pub closing_balance_cents: Option<i64>,
    /// Ledger-computed balance the drawer should hold at closing.
    pub expected_balance_cents: Option<i64>,
    /// closing - expected. Negative = shortage, positive = overage.
    pub difference_cents: Option<i64>,
    pub notes: Option<String>,
    pub opened_by_id: String,
    pub opened_at: DateTime<Utc>,
    pub closed_by_id: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashRegister {
    /// Returns the opening balance as Money.
    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_cents(self.opening_balance_cents)
    }

    /// Returns the total sales as Money.
    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }

    /// Checks whether the register still accepts postings.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }
}

// =============================================================================
// Cash Movement
// =============================================================================

/// One manual cash adjustment against an open register.
///
/// Append-only: never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: String,
    pub cash_register_id: String,
    pub movement_type: CashMovementType,
    /// Always positive; direction comes from `movement_type`.
    pub amount_cents: i64,
    pub reason: String,
    pub performed_by_id: String,
    pub performed_at: DateTime<Utc>,
}

impl CashMovement {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked by the stock ledger.
///
/// For SIMPLE products `stock_retail` / `stock_internal` are materialized
/// counters kept equal to the sum of movement deltas. For KIT products they
/// are not authoritative; availability is derived from components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub kind: ProductKind,
    /// Sellable on the retail shelf.
    pub is_retail: bool,
    /// Usable internally during services (backbar).
    pub is_backbar: bool,
    pub stock_retail: i64,
    pub stock_internal: i64,
    pub min_stock_retail: i64,
    pub min_stock_internal: i64,
    pub cost_price_cents: i64,
    pub sale_price_cents: i64,
    /// Unit of measure ("un", "ml", "g").
    pub unit: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialized counter for a location. Only meaningful for SIMPLE kinds.
    #[inline]
    pub fn stock_at(&self, location: StockLocation) -> i64 {
        match location {
            StockLocation::Retail => self.stock_retail,
            StockLocation::Internal => self.stock_internal,
        }
    }

    /// Minimum threshold for a location.
    #[inline]
    pub fn min_stock_at(&self, location: StockLocation) -> i64 {
        match location {
            StockLocation::Retail => self.min_stock_retail,
            StockLocation::Internal => self.min_stock_internal,
        }
    }

    /// Whether the product is enabled for a location.
    #[inline]
    pub fn enabled_at(&self, location: StockLocation) -> bool {
        match location {
            StockLocation::Retail => self.is_retail,
            StockLocation::Internal => self.is_backbar,
        }
    }

    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }
}

// =============================================================================
// Kit Component
// =============================================================================

/// Links a KIT product to one required component product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct KitComponent {
    pub id: String,
    pub kit_product_id: String,
    pub component_product_id: String,
    /// Units of the component consumed per kit.
    pub quantity: i64,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One append-only row in the stock ledger.
///
/// Invariant: for every (product, location) the materialized counter on the
/// product row equals the sum of all deltas for that product and location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub salon_id: String,
    pub product_id: String,
    /// Signed quantity change.
    pub delta: i64,
    pub location_type: StockLocation,
    pub movement_type: StockMovementType,
    /// What kind of record triggered this ("command", "manual").
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    /// Correlates the legs of a transfer or a kit consumption.
    pub group_id: Option<String>,
    pub reason: Option<String>,
    pub created_by_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Commission
// =============================================================================

/// A commission owed to a professional for one sold line item.
///
/// Created once per line item at sale time and then only transitioned
/// through its status machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Commission {
    pub id: String,
    pub salon_id: String,
    pub command_id: String,
    pub command_item_id: String,
    pub professional_id: String,
    pub item_description: String,
    pub item_value_cents: i64,
    /// Commission rate in basis points (4000 = 40%).
    pub commission_rate_bps: i64,
    /// round(item_value x rate, centavo). Frozen at creation.
    pub commission_value_cents: i64,
    pub status: CommissionStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub paid_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Commission {
    /// Returns the commission value as Money.
    #[inline]
    pub fn commission_value(&self) -> Money {
        Money::from_cents(self.commission_value_cents)
    }

    /// Checks whether the commission can still transition.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == CommissionStatus::Pending
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_location_accessors() {
        let product = Product {
            id: "p1".into(),
            salon_id: "s1".into(),
            name: "Shampoo".into(),
            kind: ProductKind::Simple,
            is_retail: true,
            is_backbar: false,
            stock_retail: 7,
            stock_internal: 2,
            min_stock_retail: 5,
            min_stock_internal: 1,
            cost_price_cents: 1500,
            sale_price_cents: 3990,
            unit: "un".into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(product.stock_at(StockLocation::Retail), 7);
        assert_eq!(product.stock_at(StockLocation::Internal), 2);
        assert_eq!(product.min_stock_at(StockLocation::Retail), 5);
        assert!(product.enabled_at(StockLocation::Retail));
        assert!(!product.enabled_at(StockLocation::Internal));
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&RegisterStatus::Open).unwrap(),
            "\"open\""
        );
        assert_eq!(
            serde_json::to_string(&StockMovementType::KitConsumption).unwrap(),
            "\"kit_consumption\""
        );
        assert_eq!(
            serde_json::to_string(&CommissionStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
