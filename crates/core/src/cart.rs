//! Cart items and subtotals.

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// One line in the shopping cart (`GET /api/cart`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(alias = "product")]
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the item was added.
    pub price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartItem {
    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Sum of line totals.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

/// Total number of units across all lines.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0, |count, item| count.saturating_add(item.quantity))
}
