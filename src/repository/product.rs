use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::unicode_lower;
use crate::domain::category::Category;
use crate::domain::product::{
    NewProduct, Product, ProductDetail, ProductLabel, ProductUpdate, ProductWithCategory,
};
use crate::domain::types::{CategoryName, ProductId, ProductName};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
    ProductLabel as DbProductLabel,
};
use crate::repository::{
    DieselRepository, ProductReader, ProductSearchQuery, ProductWriter, RepositoryError,
    RepositoryResult,
};

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl ProductReader for DieselRepository {
    fn list_products_with_category(&self) -> RepositoryResult<Vec<ProductWithCategory>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let rows = products::table
            .left_join(categories::table)
            .select((DbProduct::as_select(), categories::name.nullable()))
            .order(products::id.asc())
            .load::<(DbProduct, Option<String>)>(&mut conn)?;

        rows.into_iter()
            .map(|(product, category)| -> RepositoryResult<ProductWithCategory> {
                Ok(ProductWithCategory {
                    product: product.try_into()?,
                    category: category.map(CategoryName::new).transpose()?,
                })
            })
            .collect()
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .find(id.get())
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn get_product_detail(&self, id: ProductId) -> RepositoryResult<Option<ProductDetail>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let row = products::table
            .left_join(categories::table)
            .filter(products::id.eq(id.get()))
            .select((
                DbProduct::as_select(),
                (categories::id, categories::name).nullable(),
            ))
            .first::<(DbProduct, Option<(i32, String)>)>(&mut conn)
            .optional()?;

        let Some((product, category)) = row else {
            return Ok(None);
        };

        Ok(Some(ProductDetail {
            product: product.try_into()?,
            category: category.map(Category::try_from).transpose()?,
        }))
    }

    fn product_name_exists(
        &self,
        name: &ProductName,
        except: Option<ProductId>,
    ) -> RepositoryResult<bool> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut query = products::table
            .filter(products::name.eq(name.as_str()))
            .into_boxed::<Sqlite>();

        if let Some(except) = except {
            query = query.filter(products::id.ne(except.get()));
        }

        let count = query.count().get_result::<i64>(&mut conn)?;
        Ok(count > 0)
    }

    fn search_products(&self, query: ProductSearchQuery) -> RepositoryResult<Vec<ProductLabel>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table
            .select((
                products::id,
                products::name,
                products::stock,
                products::price,
            ))
            .into_boxed::<Sqlite>();

        // Both sides are folded so non-ASCII names match regardless of case.
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            items = items.filter(unicode_lower(products::name).like(pattern).escape('\\'));
        }

        items
            .order(products::name.asc())
            .limit(query.limit as i64)
            .load::<DbProductLabel>(&mut conn)?
            .into_iter()
            .map(|label| -> RepositoryResult<ProductLabel> { Ok(label.try_into()?) })
            .collect()
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(products::table)
                .values(DbNewProduct::from_domain(product, now))
                .returning(DbProduct::as_returning())
                .get_result(conn)?;
            Ok(row)
        })?;

        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let updated = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::update(products::table.find(id.get()))
                .set(ProductChangeset::from_domain(update, now))
                .returning(DbProduct::as_returning())
                .get_result(conn)?;
            Ok(row)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::delete(products::table.find(id.get())).execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(affected)
        })?;

        Ok(affected)
    }
}
