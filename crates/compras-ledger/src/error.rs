//! Ledger and intake errors

use std::collections::BTreeMap;
use std::fmt;

use compras_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Field-level validation messages, keyed by the draft's wire field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{}: {}", field, m)))
            .collect();
        write!(f, "{}", messages.join(", "))
    }
}

/// Errors that can occur in ledger and intake operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Partida not found: {partida}")]
    PartidaNotFound { partida: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Persistence(DbError::from(e))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());

        errors.add("importe", "importe is required");
        errors.add("importe", "importe must be a number");
        errors.add("moneda", "moneda is required");

        assert_eq!(errors.get("importe").map(|m| m.len()), Some(2));
        assert!(errors.contains("moneda"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["importe", "moneda"]);
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::single("partida", "partida is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "partida": ["partida is required"] }));
    }
}
