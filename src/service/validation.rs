//! Request validation driven by the table definitions: required columns, varchar limits,
//! and format checks for emails and slugs.

use crate::error::AppError;
use crate::schema::TableDef;
use regex::Regex;
use std::sync::OnceLock;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate an insert. Every required column of `table` must be present and non-blank.
    pub fn validate(table: &TableDef, fields: &[(&str, Option<&str>)]) -> Result<(), AppError> {
        for col in table.columns.iter().filter(|c| c.required()) {
            let value = fields.iter().find(|(name, _)| *name == col.name).and_then(|(_, v)| *v);
            if value.map(str::trim).unwrap_or("").is_empty() {
                return Err(AppError::Validation(format!("{} is required", col.name)));
            }
        }
        Self::validate_partial(table, fields)
    }

    /// Validate only the fields present (for updates). A present required column may not be blank.
    pub fn validate_partial(table: &TableDef, fields: &[(&str, Option<&str>)]) -> Result<(), AppError> {
        for (name, value) in fields {
            let Some(v) = value else { continue };
            let Some(col) = table.column(name) else { continue };
            if col.required() && v.trim().is_empty() {
                return Err(AppError::Validation(format!("{} must not be empty", name)));
            }
            if let Some(max) = col.ty.max_length() {
                if v.chars().count() > max {
                    return Err(AppError::Validation(format!(
                        "{} must be at most {} characters",
                        name, max
                    )));
                }
            }
            validate_format(name, v)?;
        }
        Ok(())
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug pattern"))
}

fn validate_format(col: &str, v: &str) -> Result<(), AppError> {
    match col {
        "email" if !email_re().is_match(v) => {
            Err(AppError::Validation(format!("{} must be a valid email", col)))
        }
        "slug" if !slug_re().is_match(v) => Err(AppError::Validation(format!(
            "{} may only contain lowercase letters, digits and single hyphens",
            col
        ))),
        _ => Ok(()),
    }
}
