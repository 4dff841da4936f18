//! # ledger-db: Persistence Layer for the Salon Ledger
//!
//! This crate provides database access for the salon ledger core.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Salon Ledger Data Flow                            │
//! │                                                                         │
//! │  API handler (close_register, record_sale, pay_commissions)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ledger-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌─────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │ (embedded)  │  │   │
//! │  │   │               │    │ RegisterRepo   │    │             │  │   │
//! │  │   │ SqlitePool    │◄───│ StockRepo      │    │ 001_initial │  │   │
//! │  │   │ WAL mode      │    │ CommissionRepo │    │ _schema.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (one per deployment)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The three ledgers (register, stock, commission)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/ledger.db")).await?;
//!
//! // Open a drawer with R$200.00 and post a PIX sale
//! let register = db.registers().open("salon-1", 20_000, "user-1").await?;
//! db.registers().add_sale("salon-1", "PIX", 3_000, Some("user-1")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::commission::{CommissionQuery, CommissionRepository, PayReceipt};
pub use repository::register::{RegisterRepository, SalePosting};
pub use repository::stock::{MovementQuery, StockRepository};
