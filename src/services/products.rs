use chrono::Utc;

use crate::domain::product::{
    NewProduct, Product, ProductDetail, ProductLabel, ProductUpdate, ProductWithCategory,
};
use crate::domain::types::{ImagePath, ProductId};
use crate::forms::products::{ImageRule, ProductInput, ProductPayload, ValidatedImage};
use crate::repository::{
    ProductReader, ProductSearchQuery, ProductWriter, RepositoryError,
};
use crate::storage::{BlobStore, PRODUCT_IMAGE_DIR, image_file_name};

use super::{ServiceError, ServiceResult};

const NAME_TAKEN: &str = "The name has already been taken.";

/// Path ids that are not positive integers cannot match any product.
fn parse_product_id(product_id: &str) -> ServiceResult<ProductId> {
    ProductId::parse(product_id).map_err(|_| ServiceError::NotFound)
}

fn find_product<R>(id: ProductId, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    match repo.get_product_by_id(id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(ServiceError::internal(
            e.kind(),
            format!("Failed to get product {id}: {e}"),
        )),
    }
}

/// Field rules, image rules and name uniqueness, reported together.
fn validate_product<R>(
    input: ProductInput,
    image_rule: ImageRule,
    except: Option<ProductId>,
    repo: &R,
) -> ServiceResult<ProductPayload>
where
    R: ProductReader,
{
    let mut errors = input.check(image_rule);

    let name = if errors.has("name") {
        None
    } else {
        input.product_name()
    };
    if let Some(name) = name {
        match repo.product_name_exists(&name, except) {
            Ok(true) => errors.add("name", NAME_TAKEN),
            Ok(false) => {}
            Err(e) => {
                return Err(ServiceError::internal(
                    e.kind(),
                    format!("Failed to check product name: {e}"),
                ));
            }
        }
    }

    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    input
        .into_payload(image_rule)
        .map_err(ServiceError::Validation)
}

fn store_image<S>(image: &ValidatedImage, store: &S) -> ServiceResult<ImagePath>
where
    S: BlobStore,
{
    let file_name = image_file_name(Utc::now().timestamp(), &image.extension);
    let path = ImagePath::join(PRODUCT_IMAGE_DIR, &file_name)
        .map_err(|e| ServiceError::internal("storage", format!("Invalid image path: {e}")))?;

    store.put(&path, &image.bytes).map_err(|e| {
        ServiceError::internal(e.kind(), format!("Failed to store image {path}: {e}"))
    })?;

    Ok(path)
}

/// Delete a stored image if it is still there.
fn remove_image<S>(path: &ImagePath, store: &S) -> ServiceResult<()>
where
    S: BlobStore,
{
    let exists = store.exists(path).map_err(|e| {
        ServiceError::internal(e.kind(), format!("Failed to check image {path}: {e}"))
    })?;

    if exists {
        store.delete(path).map_err(|e| {
            ServiceError::internal(e.kind(), format!("Failed to delete image {path}: {e}"))
        })?;
    }

    Ok(())
}

/// Best-effort removal of an image stored for a write that did not commit.
fn discard_image<S>(path: Option<&ImagePath>, store: &S)
where
    S: BlobStore,
{
    let Some(path) = path else {
        return;
    };
    if let Err(e) = store.delete(path) {
        log::warn!("Failed to remove orphaned image {path}: {e}");
    }
}

/// Map a failed product write into the service error surfaced to clients.
#[track_caller]
fn write_error(e: RepositoryError, action: &str) -> ServiceError {
    match e {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::UniqueViolation(_) => ServiceError::field("name", NAME_TAKEN),
        e => ServiceError::internal(e.kind(), format!("Failed to {action} product: {e}")),
    }
}

/// List every product with its category name.
pub fn list_products<R>(repo: &R) -> ServiceResult<Vec<ProductWithCategory>>
where
    R: ProductReader,
{
    repo.list_products_with_category()
        .map_err(|e| ServiceError::internal(e.kind(), format!("Failed to list products: {e}")))
}

/// Fetch a single product with its category eager-loaded.
pub fn show_product<R>(product_id: &str, repo: &R) -> ServiceResult<ProductDetail>
where
    R: ProductReader,
{
    let id = parse_product_id(product_id)?;

    match repo.get_product_detail(id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(ServiceError::internal(
            e.kind(),
            format!("Failed to get product {id}: {e}"),
        )),
    }
}

/// Validate the input, store the uploaded image and insert the product.
///
/// The image is written before the database transaction; if the insert fails
/// the new file is removed again.
pub fn create_product<R, S>(input: ProductInput, repo: &R, store: &S) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
    S: BlobStore,
{
    let payload = validate_product(input, ImageRule::Required, None, repo)?;

    let image = payload
        .image
        .as_ref()
        .map(|image| store_image(image, store))
        .transpose()?;

    let new_product = NewProduct {
        name: payload.name,
        category_id: payload.category_id,
        stock: payload.stock,
        price: payload.price,
        image,
    };

    repo.create_product(&new_product).map_err(|e| {
        discard_image(new_product.image.as_ref(), store);
        write_error(e, "create")
    })
}

/// Resolve a path id to an existing product without touching the request body.
///
/// Used when the update body cannot be read, so a missing product still
/// answers 404 before the body is rejected.
pub fn ensure_product_exists<R>(product_id: &str, repo: &R) -> ServiceResult<()>
where
    R: ProductReader,
{
    let id = parse_product_id(product_id)?;
    find_product(id, repo).map(|_| ())
}

/// Update an existing product, replacing its image when a new one is sent.
///
/// A missing product is reported before any validation runs.
pub fn update_product<R, S>(
    product_id: &str,
    input: ProductInput,
    repo: &R,
    store: &S,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
    S: BlobStore,
{
    let id = parse_product_id(product_id)?;
    let existing = find_product(id, repo)?;

    let payload = validate_product(input, ImageRule::Optional, Some(id), repo)?;

    let image = match &payload.image {
        Some(image) => {
            if let Some(old_image) = &existing.image {
                remove_image(old_image, store)?;
            }
            Some(store_image(image, store)?)
        }
        None => None,
    };

    let update = ProductUpdate {
        name: payload.name,
        category_id: payload.category_id,
        stock: payload.stock,
        price: payload.price,
        image,
    };

    repo.update_product(id, &update).map_err(|e| {
        discard_image(update.image.as_ref(), store);
        write_error(e, "update")
    })
}

/// Delete a product and its stored image, returning the deleted record.
pub fn delete_product<R, S>(product_id: &str, repo: &R, store: &S) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
    S: BlobStore,
{
    let id = parse_product_id(product_id)?;
    let existing = find_product(id, repo)?;

    if let Some(image) = &existing.image {
        remove_image(image, store)?;
    }

    match repo.delete_product(id) {
        Ok(_) => Ok(existing),
        Err(e) => Err(write_error(e, "delete")),
    }
}

/// Autocomplete search: at most 100 products ordered by name.
pub fn search_products<R>(search: Option<&str>, repo: &R) -> ServiceResult<Vec<ProductLabel>>
where
    R: ProductReader,
{
    let mut query = ProductSearchQuery::default();
    if let Some(search) = search {
        query = query.search(search);
    }

    repo.search_products(query)
        .map_err(|e| ServiceError::internal(e.kind(), format!("Failed to search products: {e}")))
}
