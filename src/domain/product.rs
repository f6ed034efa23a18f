use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{
    CategoryId, CategoryName, ImagePath, ProductId, ProductName, ProductPrice, StockQuantity,
};

/// A catalog product as stored in the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub category_id: CategoryId,
    pub stock: StockQuantity,
    pub price: ProductPrice,
    /// Path of the stored image relative to the storage root.
    pub image: Option<ImagePath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Product row joined with the display name of its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    /// `None` when the referenced category no longer exists.
    pub category: Option<CategoryName>,
}

/// Product with its category eager-loaded as `{id, name}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

/// Compact projection used by the autocomplete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductLabel {
    pub id: ProductId,
    pub label: ProductName,
    pub stock: StockQuantity,
    pub price: ProductPrice,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub category_id: CategoryId,
    pub stock: StockQuantity,
    pub price: ProductPrice,
    pub image: Option<ImagePath>,
}

/// Changes applied to an existing [`Product`].
///
/// `image: None` keeps the stored image path untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    pub name: ProductName,
    pub category_id: CategoryId,
    pub stock: StockQuantity,
    pub price: ProductPrice,
    pub image: Option<ImagePath>,
}
