use thiserror::Error;

/// Payload that could not be decoded into an action group.
///
/// Recoverable: the decoder hands back an empty group alongside it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed JSON payload: {0}")]
    MalformedJson(String),

    #[error("malformed YAML payload: {0}")]
    MalformedYaml(String),

    #[error("expected an object or a list of objects, found {0}")]
    UnexpectedShape(&'static str),

    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("unsupported dialect '{0}'")]
    UnsupportedDialect(String),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
