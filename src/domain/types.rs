//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Component, Path};
use thiserror::Error;

/// Maximum number of characters accepted for a product name.
pub const PRODUCT_NAME_MAX_CHARS: usize = 255;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value was NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFiniteNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string exceeded its maximum length in characters.
    #[error("{0} may not be longer than {1} characters")]
    TooLong(&'static str, usize),
    /// A storage path was absolute or tried to leave the storage root.
    #[error("{0} must be a relative path inside the storage root")]
    InvalidPath(&'static str),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Parses a raw path/form segment into an identifier.
            pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
                value
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| TypeConstraintError::NonPositiveId($field))
                    .and_then(Self::new)
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr, $max_chars:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value within the length limit.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                if trimmed.chars().count() > $max_chars {
                    return Err(TypeConstraintError::TooLong($field, $max_chars));
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! finite_f64_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Constructs a finite numeric value.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonFiniteNumber($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for f64 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

id_newtype!(ProductId, "Unique identifier for a product.", "product_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);

non_empty_string_newtype!(
    ProductName,
    "Product name enforcing non-empty values of at most 255 characters.",
    "product name",
    PRODUCT_NAME_MAX_CHARS
);
non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category name",
    PRODUCT_NAME_MAX_CHARS
);

finite_f64_newtype!(ProductPrice, "Product price in standard currency units.", "price");
finite_f64_newtype!(StockQuantity, "Quantity of a product in stock.", "stock");

/// Location of a stored file relative to the storage root, e.g.
/// `products/1700000000-0f3c....jpg`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImagePath(String);

impl ImagePath {
    /// Accepts non-empty relative paths made only of normal components.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "image path")?;
        let escapes_root = Path::new(&trimmed)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes_root {
            return Err(TypeConstraintError::InvalidPath("image path"));
        }
        Ok(Self(trimmed))
    }

    /// Joins a directory and a file name into a storage path.
    pub fn join(directory: &str, file_name: &str) -> Result<Self, TypeConstraintError> {
        Self::new(format!("{}/{}", directory.trim_end_matches('/'), file_name))
    }

    /// Borrow the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned path.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ImagePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ImagePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for ImagePath {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<&str> for ImagePath {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_product_names() {
        let value = ProductName::new("  widget  ").unwrap();
        assert_eq!(value.as_str(), "widget");
    }

    #[test]
    fn rejects_empty_product_names() {
        assert_eq!(
            ProductName::new("   ").unwrap_err(),
            TypeConstraintError::EmptyString("product name")
        );
    }

    #[test]
    fn rejects_product_names_over_limit() {
        assert!(ProductName::new("a".repeat(255)).is_ok());
        assert_eq!(
            ProductName::new("a".repeat(256)).unwrap_err(),
            TypeConstraintError::TooLong("product name", 255)
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(ProductName::new("ж".repeat(255)).is_ok());
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("product_id"));
    }

    #[test]
    fn parses_ids_from_path_segments() {
        assert_eq!(ProductId::parse(" 42 ").unwrap(), 42);
        assert!(ProductId::parse("abc").is_err());
        assert!(ProductId::parse("-3").is_err());
    }

    #[test]
    fn price_rejects_non_finite_numbers() {
        assert_eq!(
            ProductPrice::new(f64::NAN).unwrap_err(),
            TypeConstraintError::NonFiniteNumber("price")
        );
        assert_eq!(StockQuantity::new(-2.0).unwrap().get(), -2.0);
    }

    #[test]
    fn image_path_must_stay_inside_root() {
        assert!(ImagePath::new("products/a.jpg").is_ok());
        assert!(ImagePath::new("/etc/passwd").is_err());
        assert!(ImagePath::new("products/../../secret").is_err());
        assert_eq!(
            ImagePath::join("products/", "a.png").unwrap(),
            "products/a.png"
        );
    }
}
