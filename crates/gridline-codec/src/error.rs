/// Errors produced by the oracle-word and batch codecs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("oracle word must be {expected} bytes, got {actual}")]
    WordLength { expected: usize, actual: usize },

    #[error("field {field} exceeds its declared width")]
    FieldOverflow { field: &'static str },

    #[error("framing error: {0}")]
    Framing(String),

    #[error("unknown batch format tag {0}")]
    UnknownFormat(u8),

    #[error("batch too large: {size} bytes (max {max})")]
    BatchTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
