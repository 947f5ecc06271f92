//! Grievance Error - Unified Error Types
//!
//! Error handling for every layer of the grievance console. Errors are grouped
//! by where they originate (transport, HTTP status, server business rules,
//! shape validation, local session storage) so callers can decide whether to
//! surface, log, or swallow them.
//!
//! Key Features:
//! - One variant per failure class of the remote API boundary
//! - Classification helpers for transport, rejection and validation errors
//! - Conversions from std::io and serde_json errors
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all grievance console operations.
#[derive(Error, Debug)]
pub enum GrievanceError {
    // Transport errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned status {status}: {message}")]
    Http { status: u16, message: String },

    // Server-reported business failures (`success: false`)
    #[error("request rejected: {0}")]
    Rejected(String),

    // Authentication errors
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    // Shape and input errors
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    // Local errors
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("session storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for grievance console operations.
pub type Result<T> = std::result::Result<T, GrievanceError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<serde_json::Error> for GrievanceError {
    fn from(err: serde_json::Error) -> Self {
        GrievanceError::Serialization(err.to_string())
    }
}

// =============================================================================
// Error Classification
// =============================================================================

impl GrievanceError {
    /// Build an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        GrievanceError::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns true if the request never produced a server response.
    pub fn is_transport(&self) -> bool {
        matches!(self, GrievanceError::Transport(_))
    }

    /// Returns true if the server answered but refused the operation.
    pub fn is_server_rejection(&self) -> bool {
        matches!(
            self,
            GrievanceError::Http { .. }
                | GrievanceError::Rejected(_)
                | GrievanceError::AuthenticationFailed(_)
        )
    }

    /// Returns true if the input or response shape was invalid.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GrievanceError::Validation(_) | GrievanceError::Serialization(_)
        )
    }

    /// Returns true if the error means the viewer has to sign in again.
    pub fn requires_login(&self) -> bool {
        match self {
            GrievanceError::NotAuthenticated => true,
            GrievanceError::Http { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// HTTP status code, when the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GrievanceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GrievanceError::http(500, "Internal Server Error");
        assert_eq!(err.to_string(), "server returned status 500: Internal Server Error");

        let err = GrievanceError::AuthenticationFailed("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "authentication failed: Invalid credentials");
    }

    #[test]
    fn test_classification() {
        assert!(GrievanceError::Transport("refused".to_string()).is_transport());
        assert!(GrievanceError::Rejected("duplicate".to_string()).is_server_rejection());
        assert!(GrievanceError::http(404, "missing").is_server_rejection());
        assert!(GrievanceError::Validation("bad".to_string()).is_validation());
        assert!(!GrievanceError::NotAuthenticated.is_validation());
    }

    #[test]
    fn test_requires_login() {
        assert!(GrievanceError::NotAuthenticated.requires_login());
        assert!(GrievanceError::http(401, "expired").requires_login());
        assert!(!GrievanceError::http(500, "boom").requires_login());
        assert_eq!(GrievanceError::http(403, "no").status_code(), Some(403));
    }

    #[test]
    fn test_from_serde_json() {
        let err: GrievanceError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GrievanceError::Serialization(_)));
    }
}
