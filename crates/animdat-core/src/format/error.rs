use thiserror::Error;

/// Errors returned while decoding an animation package.
///
/// # Examples
/// ```
/// use animdat_core::DecodeError;
///
/// let err = DecodeError::OutOfBounds {
///     field: "num_animations",
///     at_offset: 1,
///     needed_bytes: 2,
///     available_bytes: 0,
/// };
/// assert!(err.to_string().contains("out of bounds at offset 1"));
/// assert_eq!(err.offset(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(
        "{field} out of bounds at offset {at_offset}: need {needed_bytes} bytes, {available_bytes} available"
    )]
    OutOfBounds {
        /// Name of the field being read when the buffer ran out.
        field: &'static str,
        at_offset: usize,
        needed_bytes: usize,
        available_bytes: usize,
    },
}

impl DecodeError {
    /// Buffer offset at which the failing read started.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::OutOfBounds { at_offset, .. } => *at_offset,
        }
    }
}
