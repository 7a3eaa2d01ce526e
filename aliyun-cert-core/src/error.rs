//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use aliyun_cert_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Certificate not found in the certificate store
    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),

    /// CDN / Live domain not found
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// No Alidns zone hosts the domain
    #[error("No DNS zone found for: {0}")]
    ZoneNotFound(String),

    /// DNS record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Access key rejected by the remote API
    #[error("Invalid credentials: {0}")]
    CredentialsInvalid(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local file access failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Any other remote failure (transport, permission, throttling, unexpected response)
    #[error("{0}")]
    RemoteApi(ProviderError),
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::CertificateNotFound { certificate_id, .. } => {
                Self::CertificateNotFound(certificate_id)
            }
            ProviderError::DomainNotFound { domain, .. } => Self::DomainNotFound(domain),
            ProviderError::RecordNotFound { record_id, .. } => Self::RecordNotFound(record_id),
            ProviderError::InvalidCredentials {
                provider,
                raw_message,
            } => Self::CredentialsInvalid(match raw_message {
                Some(msg) => format!("[{provider}] {msg}"),
                None => format!("[{provider}] access key rejected"),
            }),
            other => Self::RemoteApi(other),
        }
    }
}

impl CoreError {
    pub(crate) fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::CertificateNotFound(_)
            | Self::DomainNotFound(_)
            | Self::ZoneNotFound(_)
            | Self::RecordNotFound(_)
            | Self::CredentialsInvalid(_)
            | Self::Validation(_) => true,
            Self::RemoteApi(e) => e.is_expected(),
            Self::Io { .. } => false,
        }
    }

    /// Whether the error means the requested resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CertificateNotFound(_)
                | Self::DomainNotFound(_)
                | Self::ZoneNotFound(_)
                | Self::RecordNotFound(_)
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
