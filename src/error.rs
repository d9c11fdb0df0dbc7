use thiserror::Error;

/// Errors reported by the checked entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SortError {
    /// Every key needs exactly one payload value.
    #[error("length mismatch: {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },
}
