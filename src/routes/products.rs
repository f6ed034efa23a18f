use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, route, web};
use serde::Deserialize;
use serde_json::json;

use crate::forms::products::{ProductInput, ProductMultipartForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::response::{error_response, invalid_body, success};
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    ensure_product_exists as ensure_product_exists_service,
    list_products as list_products_service, search_products as search_products_service,
    show_product as show_product_service, update_product as update_product_service,
};
use crate::storage::LocalBlobStore;

#[derive(Deserialize, Debug)]
struct SearchQueryParams {
    search: Option<String>,
}

fn read_form(form: MultipartForm<ProductMultipartForm>) -> Result<ProductInput, ServiceError> {
    ProductInput::try_from(form.into_inner())
        .map_err(|e| ServiceError::internal("upload", format!("Failed to read product form: {e}")))
}

#[get("/products")]
pub async fn list_products(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_products_service(repo.get_ref()) {
        Ok(products) => success(
            "Product list fetched successfully",
            json!({ "products": products }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}

#[post("/products")]
pub async fn create_product(
    form: Result<MultipartForm<ProductMultipartForm>, actix_web::Error>,
    repo: web::Data<DieselRepository>,
    store: web::Data<LocalBlobStore>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let form = match form {
        Ok(form) => form,
        Err(err) => return invalid_body(&err),
    };

    let result = read_form(form)
        .and_then(|input| create_product_service(input, repo.get_ref(), store.get_ref()));

    match result {
        Ok(product) => success(
            "Product created successfully",
            json!({ "product": product }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}

#[get("/products/search")]
pub async fn search_products(
    params: web::Query<SearchQueryParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match search_products_service(params.search.as_deref(), repo.get_ref()) {
        Ok(products) => success(
            "Searched products fetched successfully",
            json!({ "products": products }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    product_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match show_product_service(&product_id, repo.get_ref()) {
        Ok(product) => success(
            "Product fetched successfully",
            json!({ "product": product }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}

#[route("/products/{product_id}", method = "PUT", method = "PATCH", method = "POST")]
pub async fn update_product(
    product_id: web::Path<String>,
    form: Result<MultipartForm<ProductMultipartForm>, actix_web::Error>,
    repo: web::Data<DieselRepository>,
    store: web::Data<LocalBlobStore>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    // A missing product is reported before an unreadable body.
    let form = match form {
        Ok(form) => form,
        Err(err) => {
            return match ensure_product_exists_service(&product_id, repo.get_ref()) {
                Ok(()) => invalid_body(&err),
                Err(e) => error_response(e, server_config.expose_error_details),
            };
        }
    };

    let result = read_form(form).and_then(|input| {
        update_product_service(&product_id, input, repo.get_ref(), store.get_ref())
    });

    match result {
        Ok(product) => success(
            "Product updated successfully",
            json!({ "product": product }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    store: web::Data<LocalBlobStore>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match delete_product_service(&product_id, repo.get_ref(), store.get_ref()) {
        Ok(product) => success(
            "Product deleted successfully",
            json!({ "product": product }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}
