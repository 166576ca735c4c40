pub mod schema;
pub mod salvage;
pub mod evidence;
pub mod types;
pub mod gemini;
pub mod context;
pub mod dispatch;
pub mod extraction;
pub mod merge;
pub mod prompt;
pub mod intake;
pub mod update;
pub mod analyses;
pub mod narrative;
pub mod search;

pub use schema::*;
pub use salvage::*;
pub use evidence::*;
pub use types::*;
pub use gemini::*;
pub use context::*;
pub use dispatch::*;
pub use extraction::*;
pub use merge::*;
pub use intake::*;
pub use update::*;
pub use analyses::*;
pub use narrative::*;
pub use search::*;

use std::time::Duration;

use thiserror::Error;

/// Shown to users whenever both models failed.
pub const REMEDIATION_HINT: &str = "Intente de nuevo con un documento más pequeño.";

/// Failure of a single call against one model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("AI service is not reachable at {0}")]
    Connection(String),

    #[error("AI service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("No answer within {0:?}")]
    Timeout(Duration),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Request task aborted: {0}")]
    Aborted(String),
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Error de conexión con el servicio de IA. {hint} (primary: {primary}; fallback: {fallback})", hint = REMEDIATION_HINT)]
    ServiceUnavailable {
        primary: ServiceError,
        fallback: ServiceError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// User-facing advice, when there is any.
    pub fn remediation_hint(&self) -> Option<&'static str> {
        match self {
            Self::ServiceUnavailable { .. } => Some(REMEDIATION_HINT),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message_carries_hint_and_causes() {
        let err = AuditError::ServiceUnavailable {
            primary: ServiceError::Timeout(Duration::from_secs(60)),
            fallback: ServiceError::Status {
                status: 503,
                body: "overloaded".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains(REMEDIATION_HINT));
        assert!(msg.contains("60s"));
        assert!(msg.contains("503"));
        assert_eq!(err.remediation_hint(), Some(REMEDIATION_HINT));
    }

    #[test]
    fn config_error_has_no_hint() {
        let err = AuditError::Config("missing key".into());
        assert!(err.remediation_hint().is_none());
        assert_eq!(err.to_string(), "Configuration error: missing key");
    }
}
