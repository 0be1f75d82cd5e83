//! Common result and error types for the Strata toolchain.

/// The standard result type for fallible internal operations.
///
/// `Err` means the input tables broke a contract the toolchain relies on, or
/// there is a bug in Strata. Advisory findings are reported through the
/// diagnostic sink and the operation still returns `Ok`.
pub type StrataResult<T> = Result<T, InternalError>;

/// An internal error: the run cannot continue.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("bitset size mismatch");
        assert_eq!(
            format!("{err}"),
            "internal compiler error: bitset size mismatch"
        );
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
