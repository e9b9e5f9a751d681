//! Error types for mapper loading and query execution.

use std::path::PathBuf;

use dynsql_core::TemplateError;

/// Errors that can occur while loading mapper files or running
/// registered queries.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// The requested query id does not exist in the registry.
    #[error("Query not found: {module}/{id}")]
    QueryNotFound {
        /// Module name (mapper file stem).
        module: String,
        /// Query id within the module.
        id: String,
    },

    /// A registered fragment is not valid template markup.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// A mapper file could not be parsed.
    #[error("Malformed mapper file {path}: {message}")]
    Malformed {
        /// Path of the offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The resolved SQL references a parameter that was never bound.
    #[error("Missing bind parameter: {0}")]
    MissingParameter(String),

    /// Database error from the underlying pool.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error while reading mapper files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for mapper operations.
pub type Result<T> = std::result::Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapperError::QueryNotFound {
            module: "jobs".to_string(),
            id: "find_by_status".to_string(),
        };
        assert_eq!(err.to_string(), "Query not found: jobs/find_by_status");

        let err = MapperError::MissingParameter("status".to_string());
        assert_eq!(err.to_string(), "Missing bind parameter: status");
    }

    #[test]
    fn test_template_error_converts() {
        let template_err = TemplateError::new("unclosed element".to_string(), 4);
        let err: MapperError = template_err.into();
        assert!(matches!(err, MapperError::Template(_)));
        assert_eq!(
            err.to_string(),
            "Malformed template: unclosed element at offset 4"
        );
    }
}
