use thiserror::Error;

/// A problem with a single form field. Blocks submission until corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} is required")]
    Missing { field: String },

    #[error("{field}: {message}")]
    InvalidJson { field: String, message: String },

    #[error("{field}: cannot read file: {message}")]
    UnreadableFile { field: String, message: String },
}

impl FieldError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            FieldError::Missing { field }
            | FieldError::InvalidJson { field, .. }
            | FieldError::UnreadableFile { field, .. } => field,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("{} field(s) need attention", .0.len())]
    Validation(Vec<FieldError>),

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ExploreError {
    /// Per-field errors, empty for non-validation failures
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ExploreError::Validation(errors) => errors,
            ExploreError::InvalidUrl { .. } => &[],
        }
    }
}
