// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Error Types
 * Error taxonomy for probing and job submission with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Main scanner error type
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Transport-level errors (refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// A response was obtained but it was not the one we needed
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Malformed host, dangerous characters, empty command
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(
        "AUTHORIZATION NOT CONFIRMED: explicit written permission is required to scan these targets. \
         Unauthorized scanning is illegal under CFAA and similar laws."
    )]
    AuthorizationNotConfirmed,

    #[error("No targets provided for scanning")]
    NoTargets,

    /// General errors
    #[error("{0}")]
    General(String),
}

/// Network-specific errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection refused for {url}")]
    ConnectionRefused { url: String },

    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    #[error("DNS resolution failed for {host}: {reason}")]
    DnsResolutionFailed { host: String, reason: String },

    #[error("Network error: {0}")]
    Other(String),
}

/// HTTP-level errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Unexpected HTTP {status_code} from {url}")]
    UnexpectedStatus { status_code: u16, url: String },

    #[error("Malformed HTTP response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

/// Machine-usable classification attached to every terminal failure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ValidationError,
    ConnectivityError,
    ProtocolError,
    AuthPresent,
    UnknownError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ValidationError => "validation_error",
            ErrorCategory::ConnectivityError => "connectivity_error",
            ErrorCategory::ProtocolError => "protocol_error",
            ErrorCategory::AuthPresent => "auth_present",
            ErrorCategory::UnknownError => "unknown_error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HttpError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::UnexpectedStatus { status_code, .. } => Some(*status_code),
            HttpError::MalformedResponse { .. } => None,
        }
    }

    /// 401/403 means the service enforces authentication
    pub fn is_auth_required(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }
}

impl ScannerError {
    /// Classify into the error taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScannerError::Validation(_)
            | ScannerError::AuthorizationNotConfirmed
            | ScannerError::NoTargets => ErrorCategory::ValidationError,
            ScannerError::Network(NetworkError::Other(_)) => ErrorCategory::UnknownError,
            ScannerError::Network(_) => ErrorCategory::ConnectivityError,
            ScannerError::Http(e) if e.is_auth_required() => ErrorCategory::AuthPresent,
            ScannerError::Http(e) if e.status_code() == Some(404) => ErrorCategory::ProtocolError,
            _ => ErrorCategory::UnknownError,
        }
    }

    /// Check if error is retryable
    ///
    /// Validation failures cannot change on retry, and neither can an
    /// authenticated service's 401/403.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.category(),
            ErrorCategory::ValidationError | ErrorCategory::AuthPresent
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ScannerError::Network(NetworkError::ConnectionTimeout { .. })
        )
    }

    pub fn is_dns_failure(&self) -> bool {
        matches!(
            self,
            ScannerError::Network(NetworkError::DnsResolutionFailed { .. })
        )
    }

    pub fn is_connection_refused(&self) -> bool {
        matches!(
            self,
            ScannerError::Network(NetworkError::ConnectionRefused { .. })
        )
    }
}

/// Convert reqwest errors to our error types
impl From<reqwest::Error> for ScannerError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();

        if err.is_timeout() {
            return ScannerError::Network(NetworkError::ConnectionTimeout {
                url,
                timeout: Duration::from_secs(0),
            });
        }

        if err.is_connect() {
            // reqwest doesn't expose the io::ErrorKind directly, walk the source chain
            let chain = error_chain_text(&err);
            let lowered = chain.to_lowercase();
            if lowered.contains("dns") || lowered.contains("failed to lookup address") {
                let host = err
                    .url()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_default();
                return ScannerError::Network(NetworkError::DnsResolutionFailed {
                    host,
                    reason: chain,
                });
            }
            if lowered.contains("timed out") {
                return ScannerError::Network(NetworkError::ConnectionTimeout {
                    url,
                    timeout: Duration::from_secs(0),
                });
            }
            return ScannerError::Network(NetworkError::ConnectionRefused { url });
        }

        if err.is_decode() {
            return ScannerError::Http(HttpError::MalformedResponse {
                url,
                reason: err.to_string(),
            });
        }

        ScannerError::General(error_chain_text(&err))
    }
}

fn error_chain_text(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Result type for scanner operations
pub type ScannerResult<T> = Result<T, ScannerError>;
