use crate::db::{DbConnection, DbPool};
use crate::domain::category::Category;
use crate::domain::product::{
    NewProduct, Product, ProductDetail, ProductLabel, ProductUpdate, ProductWithCategory,
};
use crate::domain::types::{ProductId, ProductName};

pub mod category;
pub mod errors;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Hard cap on rows returned by the product autocomplete search.
pub const SEARCH_RESULT_LIMIT: usize = 100;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used by the product autocomplete search.
#[derive(Debug, Clone)]
pub struct ProductSearchQuery {
    /// Case-insensitive substring matched against product names.
    pub search: Option<String>,
    /// Maximum number of rows to return.
    pub limit: usize,
}

impl Default for ProductSearchQuery {
    fn default() -> Self {
        Self {
            search: None,
            limit: SEARCH_RESULT_LIMIT,
        }
    }
}

impl ProductSearchQuery {
    /// Blank search strings are ignored so the query stays unfiltered.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List every product together with its category name.
    fn list_products_with_category(&self) -> RepositoryResult<Vec<ProductWithCategory>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Retrieve a product with its category eager-loaded.
    fn get_product_detail(&self, id: ProductId) -> RepositoryResult<Option<ProductDetail>>;
    /// Whether another product already uses `name`, ignoring `except`.
    fn product_name_exists(
        &self,
        name: &ProductName,
        except: Option<ProductId>,
    ) -> RepositoryResult<bool>;
    /// Autocomplete search ordered by name.
    fn search_products(&self, query: ProductSearchQuery) -> RepositoryResult<Vec<ProductLabel>>;
}

/// Write operations for product entities.
///
/// Every method runs its statement inside a single transaction.
pub trait ProductWriter {
    /// Persist a new product and return the stored row.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Apply `update` to an existing product and return the stored row.
    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<Product>;
    /// Delete a product by id, returning the number of removed rows.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        let query = ProductSearchQuery::default().search("   ");
        assert!(query.search.is_none());
        assert_eq!(query.limit, SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn search_is_trimmed_and_keeps_the_cap() {
        let query = ProductSearchQuery::default().search(" wid ");
        assert_eq!(query.search.as_deref(), Some("wid"));
        assert_eq!(query.limit, SEARCH_RESULT_LIMIT);
    }
}
