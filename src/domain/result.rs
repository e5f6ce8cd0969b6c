//! Result type alias for studyferry

use super::errors::EngineError;

/// Result type alias for engine operations
///
/// # Examples
///
/// ```
/// use studyferry::domain::result::Result;
/// use studyferry::domain::errors::EngineError;
///
/// fn resolve_nothing() -> Result<()> {
///     Err(EngineError::IndexOutOfRange { index: 0, len: 0 })
/// }
/// ```
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::EngineError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(EngineError::Busy("scan"));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
