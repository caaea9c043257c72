//! Author model and related types

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Date format accepted from forms (HTML date inputs)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest accepted author name, after trimming
pub const MAX_NAME_LENGTH: usize = 50;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Author: {}, born on {}", self.name, self.birth_date)?;
        if let Some(death) = self.date_of_death {
            write!(f, ", died on {}", death)?;
        }
        Ok(())
    }
}

/// Raw author form as submitted by the client
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[validate(custom(function = "validate_name"))]
    #[serde(default)]
    pub name: String,
    /// Birth date, `YYYY-MM-DD`
    #[validate(custom(function = "validate_date"))]
    #[serde(default)]
    pub birthdate: String,
    /// Date of death, `YYYY-MM-DD`; empty when the author is alive
    #[validate(custom(function = "validate_optional_date"))]
    #[serde(default)]
    pub date_of_death: String,
}

/// Validated author ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
}

impl NewAuthor {
    /// Validate a raw form, reporting every malformed field at once
    pub fn from_form(form: &AuthorForm) -> AppResult<Self> {
        let mut errors = match form.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let birth_date = NaiveDate::parse_from_str(form.birthdate.trim(), DATE_FORMAT).ok();
        let date_of_death = match form.date_of_death.trim() {
            "" => None,
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT).ok(),
        };

        if let (Some(born), Some(died)) = (birth_date, date_of_death) {
            if died < born {
                errors.add(
                    "date_of_death",
                    field_error("date_order", "Date of death must not precede birth date"),
                );
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let birth_date = birth_date
            .ok_or_else(|| AppError::Validation("birthdate is not a valid date".to_string()))?;

        Ok(Self {
            name: form.name.trim().to_string(),
            birth_date,
            date_of_death,
        })
    }
}

pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Required text field, bounded in characters once surrounding whitespace is dropped
pub(crate) fn validate_trimmed_text(value: &str, max: usize) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if length == 0 {
        return Err(field_error("blank", "Value must not be blank"));
    }
    if length > max {
        let mut error = ValidationError::new("length");
        error.message = Some(format!("At most {} characters allowed", max).into());
        return Err(error);
    }
    Ok(())
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    validate_trimmed_text(value, MAX_NAME_LENGTH)
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| field_error("date", "Expected a date formatted as YYYY-MM-DD"))
}

fn validate_optional_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_date(value)
}
