use mariner_core::CoreError;

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MarinerError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Runtime(String),

    #[error("{0}")]
    Core(String),
}

// Required for foreign (Swift/Kotlin) implementations of exported traits
impl From<uniffi::UnexpectedUniFFICallbackError> for MarinerError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Transport(error.reason)
    }
}

impl From<CoreError> for MarinerError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Config(message) => Self::Config(message),
            transport @ CoreError::Transport { .. } => Self::Transport(transport.to_string()),
            other => Self::Core(other.to_string()),
        }
    }
}
