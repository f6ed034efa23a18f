pub mod categories;
pub mod errors;
pub mod products;

pub use errors::{InternalError, ServiceError, ServiceResult};
