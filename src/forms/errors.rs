use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Field-keyed validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Human label for a field: `category_id` -> `category id`.
pub fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// Message for a validator error code, worded like the public API documents.
fn message_for(field: &str, code: &str) -> String {
    let label = field_label(field);
    match code {
        "required" => format!("The {label} field is required."),
        "length" => format!("The {label} may not be greater than 255 characters."),
        "numeric" => format!("The {label} must be a number."),
        "identifier" => format!("The {label} must be a valid identifier."),
        other => format!("The {label} is invalid ({other})."),
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in value.field_errors() {
            let field = field.to_string();
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => message_for(&field, &error.code),
                };
                errors.add(&field, message);
            }
        }
        errors
    }
}
