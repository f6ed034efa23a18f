use std::io::Read;
use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::domain::types::{CategoryId, ProductName, ProductPrice, StockQuantity};
use crate::forms::errors::FieldErrors;

/// Largest accepted image upload: 5000 KB.
pub const MAX_IMAGE_BYTES: usize = 5000 * 1024;

/// Extensions accepted for product images.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpeg", "png", "jpg"];

/// Multipart body of the create/update product endpoints.
///
/// All text fields are optional strings so that missing or malformed values
/// are reported through the validation envelope instead of an extractor error.
#[derive(MultipartForm)]
pub struct ProductMultipartForm {
    pub name: Option<Text<String>>,
    pub category_id: Option<Text<String>>,
    pub stock: Option<Text<String>>,
    pub price: Option<Text<String>>,
    pub image: Option<TempFile>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("failed to read uploaded image: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Whether an image must accompany the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    Required,
    Optional,
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Client-side file name, used for the stored extension.
    pub file_name: Option<String>,
    pub size: usize,
    /// File contents; left empty when `size` exceeds [`MAX_IMAGE_BYTES`].
    pub bytes: Vec<u8>,
}

/// Detected image format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Detect the format from the file signature.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else {
            None
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

impl UploadedImage {
    /// Extension used for the stored file: the client's extension when it is
    /// an allowed one, otherwise the detected format's.
    pub fn extension(&self, kind: ImageKind) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or_else(|| kind.extension().to_string())
    }
}

/// Image that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    pub extension: String,
    pub bytes: Vec<u8>,
}

fn validate_numeric(value: &str) -> Result<(), ValidationError> {
    let looks_numeric = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    match value.parse::<f64>() {
        Ok(number) if looks_numeric && number.is_finite() => Ok(()),
        _ => Err(ValidationError::new("numeric")),
    }
}

fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    match CategoryId::parse(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("identifier")),
    }
}

/// Raw product input after trimming; empty strings are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductInput {
    #[validate(required, length(max = 255))]
    pub name: Option<String>,
    #[validate(required, custom(function = "validate_identifier"))]
    pub category_id: Option<String>,
    #[validate(required, custom(function = "validate_numeric"))]
    pub stock: Option<String>,
    #[validate(required, custom(function = "validate_numeric"))]
    pub price: Option<String>,
    #[validate(skip)]
    pub image: Option<UploadedImage>,
}

/// Typed product fields produced from a valid [`ProductInput`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub name: ProductName,
    pub category_id: CategoryId,
    pub stock: StockQuantity,
    pub price: ProductPrice,
    pub image: Option<ValidatedImage>,
}

fn normalize(value: Option<Text<String>>) -> Option<String> {
    value
        .map(|text| text.into_inner().trim().to_string())
        .filter(|text| !text.is_empty())
}

impl TryFrom<ProductMultipartForm> for ProductInput {
    type Error = ProductFormError;

    fn try_from(form: ProductMultipartForm) -> Result<Self, Self::Error> {
        let image = match form.image {
            // Browsers send an empty part when no file was chosen.
            Some(file) if file.size == 0 && file.file_name.as_deref().unwrap_or("").is_empty() => {
                None
            }
            Some(mut file) => {
                let mut bytes = Vec::new();
                if file.size <= MAX_IMAGE_BYTES {
                    bytes.reserve(file.size);
                    file.file.read_to_end(&mut bytes)?;
                }
                Some(UploadedImage {
                    file_name: file.file_name.take(),
                    size: file.size,
                    bytes,
                })
            }
            None => None,
        };

        Ok(Self {
            name: normalize(form.name),
            category_id: normalize(form.category_id),
            stock: normalize(form.stock),
            price: normalize(form.price),
            image,
        })
    }
}

impl ProductInput {
    /// Name as a domain value, if it is present and well-formed.
    pub fn product_name(&self) -> Option<ProductName> {
        self.name
            .as_deref()
            .and_then(|name| ProductName::new(name).ok())
    }

    /// Run field rules and image rules, collecting every failure.
    pub fn check(&self, image_rule: ImageRule) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        match &self.image {
            None if image_rule == ImageRule::Required => {
                errors.add("image", "The image field is required.");
            }
            None => {}
            Some(image) if image.size > MAX_IMAGE_BYTES => {
                errors.add("image", "The image may not be greater than 5000 kilobytes.");
            }
            Some(image) if ImageKind::sniff(&image.bytes).is_none() => {
                errors.add("image", "The image must be a file of type: jpeg, png, jpg.");
            }
            Some(_) => {}
        }

        errors
    }

    /// Convert checked input into typed values.
    pub fn into_payload(self, image_rule: ImageRule) -> Result<ProductPayload, FieldErrors> {
        let errors = self.check(image_rule);
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut errors = FieldErrors::new();
        let name = ProductName::new(self.name.unwrap_or_default())
            .map_err(|e| errors.add("name", e.to_string()))
            .ok();
        let category_id = CategoryId::parse(self.category_id.as_deref().unwrap_or_default())
            .map_err(|e| errors.add("category_id", e.to_string()))
            .ok();
        let stock = parse_number(self.stock.as_deref())
            .and_then(|n| StockQuantity::new(n).ok())
            .or_else(|| {
                errors.add("stock", "The stock must be a number.");
                None
            });
        let price = parse_number(self.price.as_deref())
            .and_then(|n| ProductPrice::new(n).ok())
            .or_else(|| {
                errors.add("price", "The price must be a number.");
                None
            });
        let image = self.image.and_then(|image| {
            ImageKind::sniff(&image.bytes).map(|kind| ValidatedImage {
                extension: image.extension(kind),
                bytes: image.bytes,
            })
        });

        match (name, category_id, stock, price) {
            (Some(name), Some(category_id), Some(stock), Some(price)) if errors.is_empty() => {
                Ok(ProductPayload {
                    name,
                    category_id,
                    stock,
                    price,
                    image,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok())
}
