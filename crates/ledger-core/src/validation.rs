//! # Validation Module
//!
//! Input validation rules for the ledger core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API layer (outside this workspace)                           │
//! │  ├── DTO shape and type checks                                         │
//! │  └── Immediate caller feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Positive amounts, required reason text                            │
//! │  └── Runs before any database round trip                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK / NOT NULL constraints                                      │
//! │  └── Partial unique index (one open register per salon)                │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};

/// Maximum length accepted for free-text reason/notes fields.
pub const MAX_REASON_LEN: usize = 500;

/// Validates a monetary amount that must be strictly positive
/// (sale amounts, withdrawals, deposits).
pub fn validate_positive_amount(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a monetary amount that may be zero but not negative
/// (opening and closing balances).
pub fn validate_non_negative_amount(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates required reason text for manual movements.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 500 characters
///
/// ## Returns
/// The trimmed reason string.
pub fn validate_reason(reason: &str) -> ValidationResult<String> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }

    Ok(reason.to_string())
}

/// Validates a commission rate in basis points (0% to 100%).
pub fn validate_rate_bps(bps: i64) -> ValidationResult<()> {
    if !(0..=10_000).contains(&bps) {
        return Err(ValidationError::OutOfRange {
            field: "commission_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

/// Validates a stock quantity that must be strictly positive
/// (transfer quantity, sale quantity).
pub fn validate_positive_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a manual adjustment delta (any sign, but never zero).
pub fn validate_nonzero_delta(delta: i64) -> ValidationResult<()> {
    if delta == 0 {
        return Err(ValidationError::Required {
            field: "delta".to_string(),
        });
    }
    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
