use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::CatalogError;

/// Accepted stock count for a stored product.
pub const INVENTORY_RANGE: RangeInclusive<i64> = 1..=9999;

/// Fixed set of catalog categories. Serialized as the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Book,
    Food,
    Gadget,
    Other,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [Self::Book, Self::Food, Self::Gadget, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Food => "food",
            Self::Gadget => "gadget",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = CatalogError;

    /// Exact, case-sensitive match against the lowercase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(CatalogError::InvalidType)
    }
}

/// Core catalog entity. `id` is assigned by the catalog and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub inventory: u16,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of create and update requests.
///
/// `type` stays raw text and `inventory` a wide integer so that bad values
/// reach [`ProductDetails::validate`] instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub inventory: i64,
}

/// Checked form of [`ProductDetails`], ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDetails {
    pub name: String,
    pub kind: ProductType,
    pub inventory: u16,
}

impl ProductDetails {
    /// Inventory is checked before type, so a payload wrong in both reports
    /// the inventory error.
    pub fn validate(&self) -> Result<ValidDetails, CatalogError> {
        if !INVENTORY_RANGE.contains(&self.inventory) {
            return Err(CatalogError::InvalidInventory);
        }
        let inventory =
            u16::try_from(self.inventory).map_err(|_| CatalogError::InvalidInventory)?;
        let kind = self.kind.parse::<ProductType>()?;

        Ok(ValidDetails {
            name: self.name.clone(),
            kind,
            inventory,
        })
    }
}

impl ValidDetails {
    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            name: self.name,
            kind: self.kind,
            inventory: self.inventory,
        }
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ProductFilters {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
