//! # Repository Module
//!
//! Database repository implementations for the salon ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  API handler / checkout orchestrator                                   │
//! │       │                                                                 │
//! │       │  db.registers().add_sale("salon-1", "PIX", 3000, actor)        │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  RegisterRepository                                                    │
//! │  ├── current(&self, salon_id)                                          │
//! │  ├── open(&self, salon_id, opening, actor)                             │
//! │  ├── add_sale(&self, salon_id, method, amount, actor)                  │
//! │  └── close(&self, salon_id, counted, notes, actor)                     │
//! │       │                                                                 │
//! │       │  SQL inside one transaction per mutation                       │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! │  • Lifecycle invariants live next to the schema that enforces them    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`register::RegisterRepository`] - Cash drawer lifecycle and sale posting
//! - [`stock::StockRepository`] - Stock movement ledger and derived availability
//! - [`commission::CommissionRepository`] - Commission creation and payment

pub mod commission;
pub mod register;
pub mod stock;
