use actix_web::http::StatusCode;
use actix_web::{Responder, get, web};
use serde_json::json;

use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::response::{error_response, success};
use crate::services::categories::list_categories as list_categories_service;

#[get("/categories")]
pub async fn list_categories(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_categories_service(repo.get_ref()) {
        Ok(categories) => success(
            "Category list fetched successfully",
            json!({ "categories": categories }),
            StatusCode::OK,
        ),
        Err(err) => error_response(err, server_config.expose_error_details),
    }
}
