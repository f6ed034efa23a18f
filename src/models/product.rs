use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductLabel as DomainProductLabel,
    ProductUpdate as DomainProductUpdate,
};
use crate::domain::types::{
    ImagePath, ProductName, ProductPrice, StockQuantity, TypeConstraintError,
};

/// Diesel model representing a row in the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub stock: f64,
    pub price: f64,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`] used for creating new rows.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub category_id: i32,
    pub stock: f64,
    pub price: f64,
    pub image: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patch applied by updates; a `None` image leaves the column untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset<'a> {
    pub name: &'a str,
    pub category_id: i32,
    pub stock: f64,
    pub price: f64,
    pub image: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// `(id, name, stock, price)` projection loaded by the autocomplete query.
#[derive(Debug, Clone, Queryable)]
pub struct ProductLabel {
    pub id: i32,
    pub name: String,
    pub stock: f64,
    pub price: f64,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: ProductName::new(product.name)?,
            category_id: product.category_id.try_into()?,
            stock: StockQuantity::new(product.stock)?,
            price: ProductPrice::new(product.price)?,
            image: product.image.map(ImagePath::new).transpose()?,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl TryFrom<ProductLabel> for DomainProductLabel {
    type Error = TypeConstraintError;

    fn try_from(label: ProductLabel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: label.id.try_into()?,
            label: ProductName::new(label.name)?,
            stock: StockQuantity::new(label.stock)?,
            price: ProductPrice::new(label.price)?,
        })
    }
}

impl<'a> NewProduct<'a> {
    pub fn from_domain(product: &'a DomainNewProduct, now: NaiveDateTime) -> Self {
        Self {
            name: product.name.as_str(),
            category_id: product.category_id.get(),
            stock: product.stock.get(),
            price: product.price.get(),
            image: product.image.as_ref().map(ImagePath::as_str),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> ProductChangeset<'a> {
    pub fn from_domain(update: &'a DomainProductUpdate, now: NaiveDateTime) -> Self {
        Self {
            name: update.name.as_str(),
            category_id: update.category_id.get(),
            stock: update.stock.get(),
            price: update.price.get(),
            image: update.image.as_ref().map(ImagePath::as_str),
            updated_at: now,
        }
    }
}
