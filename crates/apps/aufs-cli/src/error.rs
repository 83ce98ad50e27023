//! CLI error types.

use std::path::PathBuf;

use aufs_types::ErrorCode;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry operation error.
    #[error("{0}")]
    Registry(#[from] aufs_registry::RegistryError),

    /// Store error.
    #[error("{0}")]
    Store(#[from] aufs_store::StoreError),

    /// Principal or fingerprint parse error.
    #[error("{0}")]
    Crypto(#[from] aufs_crypto::CryptoError),

    /// Attribute, capability or domain parse error.
    #[error("{0}")]
    Parse(#[from] aufs_types::ParseError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// No deployment found at the configured location.
    #[error("Registry not initialized. Run 'aufs init --owner 0x..' first.")]
    NotInitialized,

    /// `init` would overwrite an existing configuration.
    #[error("Configuration already exists at {0}. Pass --force to redeploy.")]
    ConfigExists(PathBuf),

    /// Command needs a caller and none was given.
    #[error("No caller set. Pass --caller 0x.. or set [identity] caller in the configuration.")]
    CallerRequired,
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors: 1
            Self::User(_) | Self::NotInitialized | Self::ConfigExists(_) | Self::CallerRequired => 1,
            // Input errors: 2
            Self::Crypto(_) | Self::Parse(_) => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) => 3,
            // Registry errors split by category: 4 (access), 5 (payment), 8 (other)
            Self::Registry(e) => {
                let code = e.error_code();
                if code.is_access_error() {
                    4
                } else if code.is_payment_error() {
                    5
                } else {
                    8
                }
            }
            // Store errors: 6
            Self::Store(_) => 6,
            // IO errors: 9
            Self::Io(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }

    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Registry(e) => e.error_code(),
            Self::Store(_) => ErrorCode::StorageFailure,
            Self::Config(_) | Self::Toml(_) | Self::NotInitialized | Self::ConfigExists(_) => {
                ErrorCode::InvalidConfig
            }
            Self::Crypto(_) => ErrorCode::InvalidAddress,
            Self::Parse(_) => ErrorCode::InvalidPayload,
            Self::CallerRequired => ErrorCode::Unauthorized,
            Self::Io(_) | Self::Json(_) | Self::User(_) => ErrorCode::InternalError,
        }
    }
}
