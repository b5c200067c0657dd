//! Cache types for catalog and settings responses.

use dokan_core::{ProductId, ShippingSettings};

use crate::types::{Category, Product, ProductPage, ProductQuery};

/// Cache key for read-mostly resources.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products(ProductQuery),
    Categories,
    ShippingSettings,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
    Categories(Vec<Category>),
    ShippingSettings(Box<ShippingSettings>),
}
