//! Project lifecycle types, request DTOs, and the partial-update allow-list.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Project lifecycle status. Deleting a project is a transition to
/// [`ProjectStatus::Deleted`]; rows are never physically removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Deleted,
}

impl ProjectStatus {
    /// The value stored in `projects.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Deleted => "deleted",
        }
    }

    /// Parse a caller-supplied status value.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "active" => Ok(ProjectStatus::Active),
            "deleted" => Ok(ProjectStatus::Deleted),
            other => Err(CoreError::Validation(format!(
                "status must be one of 'active', 'deleted' (got '{other}')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Partial update allow-list
// ---------------------------------------------------------------------------

/// One allow-listed project field paired with its new value.
///
/// This is the only way to describe a project update; fields outside this
/// enum cannot be expressed, so they can never reach a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectChange {
    Name(String),
    Description(String),
    Status(ProjectStatus),
    Settings(serde_json::Value),
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /projects`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Scaffold to seed the project with (see [`crate::templates`]).
    pub template: Option<String>,
    pub settings: Option<serde_json::Value>,
}

impl CreateProjectRequest {
    /// Validate the request beyond what the derive rules express.
    pub fn check(&self) -> Result<(), CoreError> {
        crate::validation::validate_request(self)?;
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "name: must not be blank".to_string(),
            ));
        }
        if let Some(settings) = &self.settings {
            validate_settings(settings)?;
        }
        Ok(())
    }
}

/// Body of `PUT /projects/{id}`.
///
/// Unknown keys in the JSON body are ignored by deserialization, which is
/// what filters a caller's payload down to the allow-listed fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    pub status: Option<String>,
    pub settings: Option<serde_json::Value>,
}

impl UpdateProjectRequest {
    /// Validate and convert into the ordered list of allow-listed changes.
    ///
    /// Returns a validation error when no updatable field is present.
    pub fn into_changes(self) -> Result<Vec<ProjectChange>, CoreError> {
        crate::validation::validate_request(&self)?;

        let mut changes = Vec::new();
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "name: must not be blank".to_string(),
                ));
            }
            changes.push(ProjectChange::Name(name));
        }
        if let Some(description) = self.description {
            changes.push(ProjectChange::Description(description));
        }
        if let Some(status) = self.status {
            changes.push(ProjectChange::Status(ProjectStatus::parse(&status)?));
        }
        if let Some(settings) = self.settings {
            validate_settings(&settings)?;
            changes.push(ProjectChange::Settings(settings));
        }

        if changes.is_empty() {
            return Err(CoreError::Validation(
                "No valid fields to update (allowed: name, description, status, settings)"
                    .to_string(),
            ));
        }
        Ok(changes)
    }
}

/// Project settings must be a JSON object when present.
pub fn validate_settings(settings: &serde_json::Value) -> Result<(), CoreError> {
    if settings.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "settings must be a JSON object".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn update(value: serde_json::Value) -> UpdateProjectRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [ProjectStatus::Active, ProjectStatus::Deleted] {
            assert_eq!(ProjectStatus::parse(status.as_str()).unwrap(), status);
        }
        assert_matches!(ProjectStatus::parse("archived"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_keys_are_filtered_out() {
        let req = update(json!({"name": "New", "user_id": "mallory", "id": "x"}));
        let changes = req.into_changes().unwrap();
        assert_eq!(changes, vec![ProjectChange::Name("New".to_string())]);
    }

    #[test]
    fn empty_update_is_rejected() {
        assert_matches!(
            update(json!({})).into_changes(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            update(json!({"created_at": "2024-01-01"})).into_changes(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn changes_keep_field_order() {
        let changes = update(json!({
            "settings": {"theme": "dark"},
            "status": "active",
            "description": "d",
            "name": "n"
        }))
        .into_changes()
        .unwrap();
        assert_eq!(
            changes,
            vec![
                ProjectChange::Name("n".to_string()),
                ProjectChange::Description("d".to_string()),
                ProjectChange::Status(ProjectStatus::Active),
                ProjectChange::Settings(json!({"theme": "dark"})),
            ]
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(update(json!({"name": ""})).into_changes().is_err());
        assert!(update(json!({"name": "   "})).into_changes().is_err());
        assert!(update(json!({"name": "x".repeat(256)})).into_changes().is_err());
        assert!(update(json!({"status": "archived"})).into_changes().is_err());
        assert!(update(json!({"settings": [1, 2]})).into_changes().is_err());
    }

    #[test]
    fn create_request_checks_name() {
        let ok: CreateProjectRequest = serde_json::from_value(json!({"name": "App"})).unwrap();
        assert!(ok.check().is_ok());

        let blank: CreateProjectRequest = serde_json::from_value(json!({"name": " "})).unwrap();
        assert_matches!(blank.check(), Err(CoreError::Validation(_)));

        let long: CreateProjectRequest =
            serde_json::from_value(json!({"name": "x".repeat(256)})).unwrap();
        assert_matches!(long.check(), Err(CoreError::Validation(_)));
    }
}
