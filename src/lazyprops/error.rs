use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropsError {
    /// A collection entry is neither a `(key, value)` pair nor a bare value.
    #[error("Malformed collection entry at position {index}: {reason}")]
    Shape { index: usize, reason: String },

    /// The collection document as a whole has the wrong shape.
    #[error("Malformed collection document: {0}")]
    Document(String),

    #[error("Instance has no attribute storage for field '{field}'")]
    NoStorage { field: String },

    #[error("Stored value for field '{field}' has an unexpected type")]
    SlotType { field: String },

    #[error("Key collision after merging defaults: '{key}'")]
    KeyCollision { key: String },

    #[error("Value rejected by field '{field}': {reason}")]
    Rejected { field: String, reason: String },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Field '{field}' is registered twice on {owner}")]
    DuplicateField { owner: String, field: String },

    #[error("Field '{field}' on {owner} has no compute function")]
    MissingCompute { owner: String, field: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PropsError {
    pub fn shape(index: usize, reason: impl Into<String>) -> Self {
        PropsError::Shape {
            index,
            reason: reason.into(),
        }
    }

    /// Convenience for write hooks that refuse a value.
    pub fn rejected(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PropsError::Rejected {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PropsError>;
