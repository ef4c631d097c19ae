//! Provider-independent failure classification.

use serde::Serialize;

/// Why an AI call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiErrorKind {
    /// No provider credential was supplied at startup.
    NotConfigured,
    /// The provider rejected the credential.
    Unauthenticated,
    /// The provider throttled the request.
    RateLimited,
    /// The request was oversized or otherwise unacceptable to the provider.
    InvalidRequest,
    /// The provider did not answer within the configured timeout.
    Timeout,
    Unknown,
}

impl AiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Unauthenticated => "unauthenticated",
            Self::RateLimited => "rate_limited",
            Self::InvalidRequest => "invalid_request",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Map a provider error `type` string (e.g. `rate_limit_error`).
    pub fn from_provider_type(error_type: &str) -> Self {
        match error_type {
            "authentication_error" | "permission_error" => Self::Unauthenticated,
            "rate_limit_error" | "overloaded_error" => Self::RateLimited,
            "invalid_request_error" | "request_too_large" | "not_found_error" => {
                Self::InvalidRequest
            }
            _ => Self::Unknown,
        }
    }

    /// Map an HTTP status from the provider. Returns `None` for statuses
    /// that carry no classification of their own.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 | 403 => Some(Self::Unauthenticated),
            429 => Some(Self::RateLimited),
            400 | 413 => Some(Self::InvalidRequest),
            408 | 504 => Some(Self::Timeout),
            _ => None,
        }
    }
}

impl std::fmt::Display for AiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified AI failure with a message safe to show to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AiError {
    pub kind: AiErrorKind,
    pub message: String,
}

impl AiError {
    pub fn new(kind: AiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_configured() -> Self {
        Self::new(
            AiErrorKind::NotConfigured,
            "AI service is not configured. Set ANTHROPIC_API_KEY to enable it.",
        )
    }

    /// Classify a non-success provider response.
    ///
    /// The HTTP status wins; the body's error `type` is consulted only when
    /// the status alone is not conclusive.
    pub fn from_response(status: u16, error_type: Option<&str>, detail: Option<&str>) -> Self {
        let kind = AiErrorKind::from_status(status)
            .or_else(|| error_type.map(AiErrorKind::from_provider_type))
            .unwrap_or(AiErrorKind::Unknown);

        let message = match kind {
            AiErrorKind::Unauthenticated => "AI provider rejected the configured API key".to_string(),
            AiErrorKind::RateLimited => {
                "AI provider rate limit reached, please retry shortly".to_string()
            }
            AiErrorKind::InvalidRequest => match detail {
                Some(detail) => format!("AI provider rejected the request: {detail}"),
                None => "AI provider rejected the request".to_string(),
            },
            AiErrorKind::Timeout => "AI provider timed out".to_string(),
            AiErrorKind::NotConfigured | AiErrorKind::Unknown => {
                format!("AI provider error (status {status})")
            }
        };
        Self::new(kind, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_takes_precedence_over_body_type() {
        let err = AiError::from_response(429, Some("invalid_request_error"), None);
        assert_eq!(err.kind, AiErrorKind::RateLimited);

        let err = AiError::from_response(403, Some("rate_limit_error"), None);
        assert_eq!(err.kind, AiErrorKind::Unauthenticated);
    }

    #[test]
    fn body_type_classifies_ambiguous_status() {
        let err = AiError::from_response(529, Some("overloaded_error"), None);
        assert_eq!(err.kind, AiErrorKind::RateLimited);

        let err = AiError::from_response(500, Some("api_error"), None);
        assert_eq!(err.kind, AiErrorKind::Unknown);

        let err = AiError::from_response(500, None, None);
        assert_eq!(err.kind, AiErrorKind::Unknown);
        assert_eq!(err.message, "AI provider error (status 500)");
    }

    #[test]
    fn invalid_request_includes_provider_detail() {
        let err = AiError::from_response(413, None, Some("prompt is too long"));
        assert_eq!(err.kind, AiErrorKind::InvalidRequest);
        assert!(err.message.contains("prompt is too long"));
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(AiErrorKind::NotConfigured.as_str(), "not_configured");
        assert_eq!(
            serde_json::to_value(AiErrorKind::RateLimited).unwrap(),
            serde_json::json!("rate_limited")
        );
    }
}
