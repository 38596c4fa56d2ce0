//! Error types for tracker access and command-line usage.

use thiserror::Error;

/// A failed call against the issue tracker API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The tracker answered with a non-success status
    #[error("{method} {path} -> {status}: {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("{method} {path} failed: {message}")]
    Transport {
        method: &'static str,
        path: String,
        message: String,
    },

    /// A success response whose body could not be decoded
    #[error("{method} {path} returned an unreadable body: {message}")]
    Decode {
        method: &'static str,
        path: String,
        message: String,
    },
}

impl ApiError {
    /// HTTP status, when the tracker answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Invalid invocation: bad arguments or missing credentials.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Invalid repository '{0}': expected 'owner/repo'")]
    InvalidRepo(String),

    #[error(
        "No tracker token configured.\n\
         \n\
         Set one of the following:\n\
         1. CLI flag: --token <token>\n\
         2. Environment: export GITHUB_TOKEN=<token>"
    )]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_carries_request_details() {
        let err = ApiError::Status {
            method: "POST",
            path: "/repos/acme/site/labels".to_string(),
            status: 422,
            body: "{\"message\":\"Validation Failed\"}".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "POST /repos/acme/site/labels -> 422: {\"message\":\"Validation Failed\"}"
        );
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = ApiError::Transport {
            method: "GET",
            path: "/repos/acme/site/issues/1".to_string(),
            message: "timed out".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("timed out"));
    }
}
