//! # ledger-core: Pure Business Logic for the Salon Ledger
//!
//! This crate is the heart of the ledger core. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Salon Ledger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        External collaborators (not in this workspace)           │   │
//! │  │   HTTP API ── Checkout/Command orchestrator ── Auth ── Catalog  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌────────┐ ┌──────────┐ │   │
//! │  │  │  types  │ │  money  │ │ reconcile │ │ stock  │ │ payment  │ │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ledger-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CashRegister, StockMovement, Commission, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`payment`] - Payment-method → drawer-bucket classification
//! - [`reconcile`] - Drawer closing math
//! - [`stock`] - Kit derived-stock and low-stock math
//! - [`timezone`] - Business-timezone (America/Sao_Paulo) date conversion
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are centavos (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payment;
pub mod reconcile;
pub mod stock;
pub mod timezone;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use payment::{classify_payment_method, PaymentBucket};
pub use reconcile::{reconcile_drawer, Reconciliation};
pub use stock::{is_low_stock, kit_effective_stock, ComponentAvailability};
pub use types::*;
