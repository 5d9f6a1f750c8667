//! Error types shared across the crate.

use thiserror::Error;

/// Everything a layout operation can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A node or edge index past the end of the container.
    #[error("index {index} out of range (length {len})")]
    InvalidIndex { index: usize, len: usize },

    /// A recorded reference (force snapshot, cluster assignment, finished
    /// simulation) no longer matches the graph it is used with.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A caller-supplied value outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl LayoutError {
    /// Bounds check producing `InvalidIndex`.
    pub fn check_index(index: usize, len: usize) -> Result<(), LayoutError> {
        if index < len {
            Ok(())
        } else {
            Err(LayoutError::InvalidIndex { index, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index() {
        assert!(LayoutError::check_index(0, 1).is_ok());
        assert!(LayoutError::check_index(4, 5).is_ok());
        assert_eq!(
            LayoutError::check_index(5, 5),
            Err(LayoutError::InvalidIndex { index: 5, len: 5 })
        );
        assert_eq!(
            LayoutError::check_index(0, 0),
            Err(LayoutError::InvalidIndex { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_display_messages() {
        let err = LayoutError::InvalidIndex { index: 3, len: 2 };
        assert_eq!(err.to_string(), "index 3 out of range (length 2)");
        let err = LayoutError::InvalidArgument("empty partition".into());
        assert_eq!(err.to_string(), "invalid argument: empty partition");
    }
}
