//! Domain entities and value objects shared by repositories and services.

pub mod category;
pub mod product;
pub mod types;
