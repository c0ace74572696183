//! Product variants and their inventory fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ProductId, VariantId};

/// Inventory accounting mode of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingType {
    /// Stock is counted on the parent product.
    Product,
    /// Stock is counted per variant.
    Variant,
    /// Stock is not tracked.
    None,
}

impl TrackingType {
    /// All tracking types in selector order.
    pub const ALL: [Self; 3] = [Self::Product, Self::Variant, Self::None];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Variant => "variant",
            Self::None => "none",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Variant => "Variant",
            Self::None => "None",
        }
    }
}

impl std::fmt::Display for TrackingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A SKU-level unit of a product, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    #[serde(rename = "inventory_tracking")]
    pub tracking_type: TrackingType,
    pub inventory_level: u32,
}

/// Errors for an inventory count entered by a user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryCountError {
    #[error("inventory count is required")]
    Empty,
    #[error("inventory count must be a whole number")]
    NotANumber,
    #[error("inventory count may have at most {max} digits")]
    TooManyDigits { max: usize },
    #[error("inventory count must be between 0 and {max}")]
    OutOfRange { max: u32 },
}

/// An inventory count accepted by the edit form: `0..=1_000_000`, at most
/// seven digits as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InventoryCount(u32);

impl InventoryCount {
    /// Largest accepted count.
    pub const MAX: u32 = 1_000_000;

    /// Longest accepted input, in digits.
    pub const MAX_DIGITS: usize = 7;

    /// Validate a numeric count.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when `value` exceeds [`Self::MAX`].
    pub const fn new(value: u32) -> Result<Self, InventoryCountError> {
        if value > Self::MAX {
            return Err(InventoryCountError::OutOfRange { max: Self::MAX });
        }
        Ok(Self(value))
    }

    /// Parse a count as typed into the form.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, non-digits, more than
    /// [`Self::MAX_DIGITS`] digits, or a value above [`Self::MAX`].
    pub fn parse(input: &str) -> Result<Self, InventoryCountError> {
        let digits = input.trim();
        if digits.is_empty() {
            return Err(InventoryCountError::Empty);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InventoryCountError::NotANumber);
        }
        if digits.len() > Self::MAX_DIGITS {
            return Err(InventoryCountError::TooManyDigits {
                max: Self::MAX_DIGITS,
            });
        }
        let value = digits
            .parse::<u32>()
            .map_err(|_| InventoryCountError::NotANumber)?;
        Self::new(value)
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InventoryCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_decodes_backend_fields() {
        let json = r#"{
            "id": 5,
            "product_id": 2,
            "product_name": "Tee",
            "sku": "TEE-RED-M",
            "inventory_tracking": "variant",
            "inventory_level": 40
        }"#;
        let variant: Variant = serde_json::from_str(json).unwrap();
        assert_eq!(variant.id, VariantId::new(5));
        assert_eq!(variant.product_id, ProductId::new(2));
        assert_eq!(variant.tracking_type, TrackingType::Variant);
        assert_eq!(variant.inventory_level, 40);
    }

    #[test]
    fn test_tracking_type_wire_values() {
        for tracking in TrackingType::ALL {
            let json = serde_json::to_string(&tracking).unwrap();
            assert_eq!(json, format!("\"{}\"", tracking.as_str()));
        }
        assert!(serde_json::from_str::<TrackingType>("\"sku\"").is_err());
    }

    #[test]
    fn test_inventory_count_bounds() {
        assert_eq!(InventoryCount::parse("0").unwrap().get(), 0);
        assert_eq!(InventoryCount::parse("1000000").unwrap().get(), 1_000_000);
        assert_eq!(
            InventoryCount::parse("1000001"),
            Err(InventoryCountError::OutOfRange { max: 1_000_000 })
        );
        assert_eq!(
            InventoryCount::parse("00000001"),
            Err(InventoryCountError::TooManyDigits { max: 7 })
        );
    }

    #[test]
    fn test_inventory_count_rejects_junk() {
        assert_eq!(InventoryCount::parse(""), Err(InventoryCountError::Empty));
        assert_eq!(
            InventoryCount::parse("-4"),
            Err(InventoryCountError::NotANumber)
        );
        assert_eq!(
            InventoryCount::parse("12.5"),
            Err(InventoryCountError::NotANumber)
        );
    }

    #[test]
    fn test_inventory_count_trims_whitespace() {
        assert_eq!(InventoryCount::parse(" 150 ").unwrap().get(), 150);
    }
}
