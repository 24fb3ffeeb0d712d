/// The ways a transform can fail.
///
/// Nothing is retried. On error the destination may hold a partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input text is not in the format the decoder expects.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The destination can not hold the result.
    ///
    /// `needed` is exact for the text encodings. For the dictionary codec it is the number of
    /// bytes the transform had produced when it ran out of space.
    #[error("destination too small: {needed} bytes needed, {available} available")]
    BufferTooSmall { needed: usize, available: usize },
    /// The code stream was not produced by this crate's encoder or was cut short.
    #[error("corrupt code stream: {0}")]
    CorruptStream(&'static str),
}

impl From<core::convert::Infallible> for Error {
    fn from(never: core::convert::Infallible) -> Self {
        match never {}
    }
}
