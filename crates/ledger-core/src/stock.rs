//! # Derived Stock Math
//!
//! Pure calculations for effective stock and low-stock flags.
//!
//! A KIT product never owns stock. Its availability at a location is
//! limited by whichever required component runs out first:
//!
//! ```text
//! effective(kit, L) = floor( min over components c of stock(c, L) / qty(c) )
//! ```
//!
//! A kit with zero declared components is ill-defined; it reports effective
//! stock 0 at every location so the system never implies availability it
//! cannot back with components.

/// One component requirement, resolved against a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentAvailability {
    /// Component stock counter at the location under consideration.
    pub stock: i64,
    /// Units of the component consumed per kit. Always > 0.
    pub quantity: i64,
}

/// Effective stock of a kit given its components at one location.
///
/// Uses floor division so negative component stock (allowed by manual
/// adjustments) pushes the kit availability below zero instead of rounding
/// toward it.
///
/// ## Example
/// ```rust
/// use ledger_core::stock::{kit_effective_stock, ComponentAvailability};
///
/// let components = [
///     ComponentAvailability { stock: 10, quantity: 2 },
///     ComponentAvailability { stock: 3, quantity: 1 },
/// ];
/// // min(floor(10/2), floor(3/1)) = min(5, 3) = 3
/// assert_eq!(kit_effective_stock(&components), 3);
/// ```
pub fn kit_effective_stock(components: &[ComponentAvailability]) -> i64 {
    components
        .iter()
        .map(|c| {
            // quantity is validated > 0 at the persistence boundary;
            // guard anyway so a bad row can never panic a listing
            if c.quantity <= 0 {
                0
            } else {
                c.stock.div_euclid(c.quantity)
            }
        })
        .min()
        .unwrap_or(0)
}

/// Low-stock flag for one location.
///
/// A location is low only when the product is enabled there; a
/// retail-only product is never flagged low on the backbar.
#[inline]
pub fn is_low_stock(enabled_at_location: bool, effective_stock: i64, min_stock: i64) -> bool {
    enabled_at_location && effective_stock <= min_stock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_limited_by_scarcest_component() {
        // A(quantity 2, stock 10) and B(quantity 1, stock 3)
        let components = [
            ComponentAvailability { stock: 10, quantity: 2 },
            ComponentAvailability { stock: 3, quantity: 1 },
        ];
        assert_eq!(kit_effective_stock(&components), 3);
    }

    #[test]
    fn test_kit_floor_division() {
        let components = [ComponentAvailability { stock: 9, quantity: 2 }];
        assert_eq!(kit_effective_stock(&components), 4);
    }

    #[test]
    fn test_kit_with_no_components_is_zero() {
        assert_eq!(kit_effective_stock(&[]), 0);
    }

    #[test]
    fn test_kit_with_negative_component_stock() {
        // floor(-3/2) = -2, not -1: a negative counter must not round up
        let components = [ComponentAvailability { stock: -3, quantity: 2 }];
        assert_eq!(kit_effective_stock(&components), -2);
    }

    #[test]
    fn test_kit_with_invalid_quantity_row() {
        let components = [ComponentAvailability { stock: 10, quantity: 0 }];
        assert_eq!(kit_effective_stock(&components), 0);
    }

    #[test]
    fn test_low_stock_requires_enabled_location() {
        assert!(is_low_stock(true, 2, 5));
        assert!(is_low_stock(true, 5, 5)); // at the threshold counts as low
        assert!(!is_low_stock(true, 6, 5));
        assert!(!is_low_stock(false, 0, 5)); // disabled location never low
    }
}
