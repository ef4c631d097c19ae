//! Chat request DTOs, conversation paging, and prompt assembly.
//!
//! Prompt assembly is pure string work so it can be tested without a
//! provider. The AI gateway only receives the finished prompt text.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::validation::validate_request;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of conversation entries returned by the history endpoint.
pub const DEFAULT_CONVERSATION_LIMIT: i64 = 50;

/// Hard cap on conversation entries per request.
pub const MAX_CONVERSATION_LIMIT: i64 = 100;

/// Characters of each existing file included in the generation context.
pub const CONTEXT_FILE_CHAR_LIMIT: usize = 1_000;

/// Marker appended to a context file that was cut short.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /chat/message`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatMessageRequest {
    pub project_id: String,
    #[validate(length(min = 1, max = 10000, message = "must be 1-10000 characters"))]
    pub message: String,
    /// Include existing project files in the prompt (default `true`).
    #[serde(default = "default_true")]
    pub include_context: bool,
}

/// Body of `POST /chat/explain`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExplainCodeRequest {
    #[validate(length(min = 1, max = 50000, message = "must be 1-50000 characters"))]
    pub code: String,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub language: Option<String>,
    pub project_id: Option<String>,
}

/// Body of `POST /chat/improve`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImproveCodeRequest {
    #[validate(length(min = 1, max = 50000, message = "must be 1-50000 characters"))]
    pub code: String,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub language: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub focus: Option<String>,
    pub project_id: Option<String>,
}

/// Body of `POST /chat/tests`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateTestsRequest {
    #[validate(length(min = 1, max = 50000, message = "must be 1-50000 characters"))]
    pub code: String,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub language: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub framework: Option<String>,
    pub project_id: Option<String>,
}

fn default_true() -> bool {
    true
}

macro_rules! impl_check {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Run the declarative validation rules.
                pub fn check(&self) -> Result<(), CoreError> {
                    validate_request(self)
                }
            }
        )+
    };
}

impl_check!(
    ChatMessageRequest,
    ExplainCodeRequest,
    ImproveCodeRequest,
    GenerateTestsRequest,
);

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Clamp a caller-supplied conversation limit into `1..=MAX_CONVERSATION_LIMIT`.
pub fn clamp_conversation_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_CONVERSATION_LIMIT)
        .clamp(1, MAX_CONVERSATION_LIMIT)
}

// ---------------------------------------------------------------------------
// Prompt assembly
// ---------------------------------------------------------------------------

/// Project facts included at the top of a generation prompt.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub template_used: Option<&'a str>,
}

/// An existing file offered to the model as context.
#[derive(Debug, Clone, Copy)]
pub struct ContextFile<'a> {
    pub file_path: &'a str,
    pub file_type: &'a str,
    pub content: &'a str,
}

/// Keep the first `limit` characters of `text`, appending
/// [`TRUNCATION_MARKER`] when anything was dropped.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Build the user prompt for code generation within a project.
pub fn build_generation_prompt(
    message: &str,
    project: ProjectContext<'_>,
    files: &[ContextFile<'_>],
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Project context:\n");
    prompt.push_str(&format!("- Name: {}\n", project.name));
    if !project.description.trim().is_empty() {
        prompt.push_str(&format!("- Description: {}\n", project.description.trim()));
    }
    if let Some(template) = project.template_used {
        prompt.push_str(&format!("- Template: {template}\n"));
    }
    prompt.push_str(&format!("- Existing files: {}\n", files.len()));

    if !files.is_empty() {
        prompt.push_str("\nExisting project files:\n");
        for file in files {
            prompt.push_str(&format!(
                "\n--- File: {} ({}) ---\n{}\n",
                file.file_path,
                file.file_type,
                truncate_chars(file.content, CONTEXT_FILE_CHAR_LIMIT)
            ));
        }
    }

    prompt.push_str("\nRequest:\n");
    prompt.push_str(message.trim());
    prompt.push('\n');
    prompt
}

fn fenced(code: &str, language: Option<&str>) -> String {
    format!("```{}\n{}\n```", language.unwrap_or(""), code.trim_end())
}

/// Build the user prompt for explaining a snippet.
pub fn build_explain_prompt(code: &str, language: Option<&str>) -> String {
    let lang = language.unwrap_or("unspecified");
    format!(
        "Explain what the following {lang} code does, step by step, and call out anything surprising.\n\n{}\n",
        fenced(code, language)
    )
}

/// Build the user prompt for improvement suggestions.
pub fn build_improve_prompt(code: &str, language: Option<&str>, focus: Option<&str>) -> String {
    let lang = language.unwrap_or("unspecified");
    let mut prompt = format!(
        "Review the following {lang} code and suggest concrete improvements for readability, correctness, and performance.\n"
    );
    if let Some(focus) = focus.filter(|f| !f.trim().is_empty()) {
        prompt.push_str(&format!("Focus especially on: {}\n", focus.trim()));
    }
    prompt.push('\n');
    prompt.push_str(&fenced(code, language));
    prompt.push('\n');
    prompt
}

/// Build the user prompt for test generation.
pub fn build_tests_prompt(code: &str, language: Option<&str>, framework: Option<&str>) -> String {
    let lang = language.unwrap_or("unspecified");
    let mut prompt = format!("Write unit tests for the following {lang} code.\n");
    if let Some(framework) = framework.filter(|f| !f.trim().is_empty()) {
        prompt.push_str(&format!("Use the {} testing framework.\n", framework.trim()));
    }
    prompt.push_str("Cover normal behavior and edge cases.\n\n");
    prompt.push_str(&fenced(code, language));
    prompt.push('\n');
    prompt
}
