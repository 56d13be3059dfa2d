use thiserror::Error;

pub type MsglogResult<T> = Result<T, MsglogError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MsglogError {
    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("Invalid preset key '{key}': keys must be non-empty, lowercase, and contain only a-z, 0-9 or '-'")]
    InvalidPresetKey { key: String },

    #[error("Duplicate preset key '{key}'")]
    DuplicatePreset { key: String },

    #[error("Preset '{key}' is missing a label")]
    MissingLabel { key: String },

    #[error("Preset '{key}' declares no style variables")]
    EmptyPreset { key: String },

    #[error("Invalid style variable '{name}' in preset '{key}': names must start with '--'")]
    InvalidVariableName { key: String, name: String },

    #[error("Invalid value for '{name}' in preset '{key}': {reason}")]
    InvalidVariableValue {
        key: String,
        name: String,
        reason: String,
    },

    #[error("Duplicate message id '{id}': message ids must be unique within a conversation")]
    DuplicateMessageId { id: String },

    #[error("Default preset '{key}' is not defined in the registry")]
    MissingDefaultPreset { key: String },
}

impl From<serde_yaml::Error> for MsglogError {
    fn from(err: serde_yaml::Error) -> Self {
        MsglogError::YamlError(err.to_string())
    }
}

/// Failure reported by a [`crate::export::ClipboardSink`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard access was denied")]
    PermissionDenied,

    #[error("Clipboard is not available in this environment")]
    Unsupported,

    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}
