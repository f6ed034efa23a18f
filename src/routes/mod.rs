use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::error::QueryPayloadError;
use actix_web::web;

use crate::models::config::ServerConfig;

pub mod categories;
pub mod products;
pub mod response;

/// Register every endpoint plus the extractor configs.
///
/// Multipart bodies are taken as `Result` by the handlers, which answer
/// unreadable bodies with the envelope themselves.
///
/// `/products/search` must be registered before `/products/{product_id}`.
pub fn configure(cfg: &mut web::ServiceConfig, server_config: &ServerConfig) {
    cfg.app_data(MultipartFormConfig::default().total_limit(server_config.max_upload_bytes))
    .app_data(
        web::QueryConfig::default()
            .error_handler(response::invalid_request::<QueryPayloadError>),
    )
    .service(products::list_products)
    .service(products::create_product)
    .service(products::search_products)
    .service(products::show_product)
    .service(products::update_product)
    .service(products::delete_product)
    .service(categories::list_categories)
    .service(Files::new("/storage", &server_config.storage_root));
}
