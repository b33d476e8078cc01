//! Book model and request payloads

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Earliest publication year accepted for a book
pub const MIN_PUBLICATION_YEAR: i32 = 1500;

/// Longest title or author accepted, in characters (`VARCHAR(255)` columns)
pub const MAX_TEXT_LENGTH: usize = 255;

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// ID of the book
    #[schema(example = 1)]
    pub id: i64,
    /// Title of the book
    #[schema(example = "The Great Gatsby")]
    pub title: String,
    /// Author of the book
    #[schema(example = "F. Scott Fitzgerald")]
    pub author: String,
    /// Year the book was published
    #[schema(example = 1925)]
    pub publication_year: i32,
    /// Creation date
    pub created_at: DateTime<Utc>,
    /// Last updated
    pub updated_at: DateTime<Utc>,
}

/// Create or update book request.
///
/// Fields are kept as raw JSON values so that a missing or wrongly typed
/// field is reported by the validation rules rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[validate(
        required(message = "The title field is required."),
        custom(function = "validate_title")
    )]
    #[schema(value_type = Option<String>, example = "The Great Gatsby")]
    pub title: Option<Value>,

    #[validate(
        required(message = "The author field is required."),
        custom(function = "validate_author")
    )]
    #[schema(value_type = Option<String>, example = "F. Scott Fitzgerald")]
    pub author: Option<Value>,

    #[validate(
        required(message = "The publication year field is required."),
        custom(function = "validate_publication_year")
    )]
    #[schema(value_type = Option<i32>, example = 1925, minimum = 1500)]
    pub publication_year: Option<Value>,
}

/// Book fields that passed validation, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// String of at most [`MAX_TEXT_LENGTH`] characters
fn validate_text(value: &Value, label: &str) -> Result<(), ValidationError> {
    let Some(text) = value.as_str() else {
        return Err(rule_error("string", format!("The {} field must be a string.", label)));
    };
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(rule_error(
            "max",
            format!(
                "The {} field must not be greater than {} characters.",
                label, MAX_TEXT_LENGTH
            ),
        ));
    }
    Ok(())
}

fn validate_title(value: &Value) -> Result<(), ValidationError> {
    validate_text(value, "title")
}

fn validate_author(value: &Value) -> Result<(), ValidationError> {
    validate_text(value, "author")
}

fn validate_publication_year(value: &Value) -> Result<(), ValidationError> {
    let Some(year) = integer_value(value) else {
        return Err(rule_error(
            "integer",
            "The publication year field must be an integer.".to_string(),
        ));
    };
    if year < MIN_PUBLICATION_YEAR {
        return Err(rule_error(
            "min",
            format!(
                "The publication year field must be at least {}.",
                MIN_PUBLICATION_YEAR
            ),
        ));
    }
    Ok(())
}

/// Integer from a JSON number or an integral numeric string
fn integer_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl BookRequest {
    /// Trim string fields; blank strings count as missing.
    fn normalized(self) -> Self {
        fn clean(value: Option<Value>) -> Option<Value> {
            match value {
                Some(Value::String(s)) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
                }
                other => other,
            }
        }

        Self {
            title: clean(self.title),
            author: clean(self.author),
            publication_year: clean(self.publication_year),
        }
    }

    /// Apply the validation rules and return the accepted fields
    pub fn validated(self) -> AppResult<BookInput> {
        let request = self.normalized();
        request.validate()?;

        let text = |value: &Option<Value>| {
            value.as_ref().and_then(Value::as_str).map(str::to_string)
        };
        match (
            text(&request.title),
            text(&request.author),
            request.publication_year.as_ref().and_then(integer_value),
        ) {
            (Some(title), Some(author), Some(publication_year)) => Ok(BookInput {
                title,
                author,
                publication_year,
            }),
            _ => Err(AppError::Internal(
                "validated book payload is missing a field".to_string(),
            )),
        }
    }
}
