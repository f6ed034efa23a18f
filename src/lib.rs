//! Core library exports for the product catalog service.
//!
//! With only the `data` feature the crate exposes the persistence layer
//! (`domain`, `models`, `schema`, `repository`). The default `server` feature
//! adds forms, services, blob storage and the actix-web routes.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;
