//! Field-by-field assembly of a detail record
//!
//! Each field of a product page is read by its own step returning an
//! `ExtractResult`. The builder decides what a failed step means: a required
//! field turns it into `ExtractError::MissingField`, an optional one records
//! the field as absent and carries on.

use crate::{ExtractError, ExtractResult};
use url::Url;

#[derive(Debug, Clone)]
pub struct DetailRecordBuilder {
    url: String,
    absent: Vec<&'static str>,
}

impl DetailRecordBuilder {
    pub fn new(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            absent: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Passes a required field through, naming it in the error when missing
    pub fn required<T>(&self, field: &'static str, step: ExtractResult<T>) -> ExtractResult<T> {
        step.map_err(|e| match e {
            ExtractError::MissingElement { selector }
            | ExtractError::MissingAttribute { selector, .. } => {
                ExtractError::MissingField { field, selector }
            }
            other => other,
        })
    }

    /// Keeps an optional field when its step succeeded
    pub fn optional<T>(&mut self, field: &'static str, step: ExtractResult<T>) -> Option<T> {
        match step {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::trace!("{}: optional field '{}' absent ({})", self.url, field, e);
                self.absent.push(field);
                None
            }
        }
    }

    /// Optional fields that could not be read, in the order they were tried
    pub fn absent_fields(&self) -> &[&'static str] {
        &self.absent
    }
}
