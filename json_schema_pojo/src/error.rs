use thiserror::Error;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Error type for a generation run.
///
/// Every variant aborts the run; nothing is emitted once one is raised.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A `$ref` or document location could not be dereferenced.
    #[error("cannot resolve schema `{uri}`: {reason}")]
    SchemaResolution { uri: String, reason: String },

    /// No generation rule matches the schema node, or enum constants collide.
    #[error("unsupported schema construct at `{uri}`: {reason}")]
    UnsupportedSchemaConstruct { uri: String, reason: String },

    /// Two distinct schemas (or two properties of one type) claim one identifier.
    #[error("name conflict on `{name}`: already used by `{existing}`, requested by `{requested}`")]
    NameConflict {
        name: String,
        existing: String,
        requested: String,
    },

    /// Discriminator metadata is incomplete or inconsistent.
    #[error("invalid discriminator on `{uri}`: {reason}")]
    AnnotationBinding { uri: String, reason: String },

    /// Settings file could not be read or parsed.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// I/O error while writing generated sources.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    pub(crate) fn resolution(uri: impl ToString, reason: impl Into<String>) -> Self {
        Self::SchemaResolution {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(uri: impl ToString, reason: impl Into<String>) -> Self {
        Self::UnsupportedSchemaConstruct {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn binding(uri: impl ToString, reason: impl Into<String>) -> Self {
        Self::AnnotationBinding {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}
