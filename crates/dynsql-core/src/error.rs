//! Template parsing errors.

/// A template fragment could not be parsed into a node tree.
///
/// Raised for structural problems only: mismatched or unclosed tags,
/// bad attribute syntax. Condition failures never raise this; they
/// make the condition false instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed template: {message} at offset {position}")]
pub struct TemplateError {
    /// Description of the structural problem.
    pub message: String,
    /// Byte offset into the fragment where it was detected.
    pub position: usize,
}

impl TemplateError {
    /// Creates a new template error.
    #[must_use]
    pub const fn new(message: String, position: usize) -> Self {
        Self { message, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offset() {
        let err = TemplateError::new("unexpected close tag".to_string(), 12);
        assert_eq!(
            err.to_string(),
            "Malformed template: unexpected close tag at offset 12"
        );
    }
}
