//! Input validation shared by the HTTP handlers.
//!
//! Everything here runs before a request reaches the persistence layer or
//! the AI gateway. Failures are [`CoreError::Validation`] and are always
//! caller-correctable.

use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Canonical hyphenated UUID, any version, case-insensitive.
pub const UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(UUID_PATTERN).expect("valid regex"));

/// Maximum length of a caller identity value.
pub const MAX_USER_ID_LENGTH: usize = 255;

/// Maximum length of a project file path.
pub const MAX_FILE_PATH_LENGTH: usize = 512;

/// Maximum size of a single project file's content in bytes (1 MiB).
pub const MAX_FILE_CONTENT_BYTES: usize = 1024 * 1024;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Parse a path-supplied identifier, rejecting anything that is not a
/// canonical hyphenated UUID.
pub fn parse_entity_id(raw: &str, field: &str) -> Result<EntityId, CoreError> {
    if !UUID_RE.is_match(raw) {
        return Err(CoreError::Validation(format!(
            "{field} must be a valid UUID"
        )));
    }
    EntityId::parse_str(raw)
        .map_err(|_| CoreError::Validation(format!("{field} must be a valid UUID")))
}

/// Validate a caller identity value taken from the identity header.
pub fn validate_user_id(raw: &str) -> Result<(), CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Unauthorized("Missing user identity".to_string()));
    }
    if trimmed.chars().count() > MAX_USER_ID_LENGTH {
        return Err(CoreError::Unauthorized(format!(
            "User identity exceeds {MAX_USER_ID_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Validate a project-relative file path.
///
/// Paths must be non-empty, relative, free of `..` segments and NUL bytes,
/// and at most [`MAX_FILE_PATH_LENGTH`] characters.
pub fn validate_file_path(path: &str) -> Result<(), CoreError> {
    if path.trim().is_empty() {
        return Err(CoreError::Validation("file_path must not be empty".to_string()));
    }
    if path.chars().count() > MAX_FILE_PATH_LENGTH {
        return Err(CoreError::Validation(format!(
            "file_path exceeds maximum length of {MAX_FILE_PATH_LENGTH} characters"
        )));
    }
    if path.contains('\0') {
        return Err(CoreError::Validation(
            "file_path must not contain NUL bytes".to_string(),
        ));
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(CoreError::Validation(
            "file_path must be relative to the project root".to_string(),
        ));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(CoreError::Validation(
            "file_path must not contain '..' segments".to_string(),
        ));
    }
    Ok(())
}

/// Validate file content size.
pub fn validate_file_content(content: &str) -> Result<(), CoreError> {
    if content.len() > MAX_FILE_CONTENT_BYTES {
        return Err(CoreError::Validation(format!(
            "content exceeds maximum size of {MAX_FILE_CONTENT_BYTES} bytes (got {})",
            content.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// DTO validation
// ---------------------------------------------------------------------------

/// Run `validator` rules on a request DTO and flatten failures into a
/// single [`CoreError::Validation`] message.
pub fn validate_request<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe_errors(&errors)))
}

fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
