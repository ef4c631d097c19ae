//! Project file helpers: save request DTO, display names, and type tags.

use serde::Deserialize;

use crate::error::CoreError;
use crate::validation::{validate_file_content, validate_file_path};

/// Type tag used when the extension is unknown or absent.
pub const DEFAULT_FILE_TYPE: &str = "text";

/// Body of `POST /projects/{id}/files`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveFileRequest {
    pub file_path: String,
    pub file_name: Option<String>,
    #[serde(default)]
    pub content: String,
    pub file_type: Option<String>,
}

/// A fully resolved file write, ready for the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub file_path: String,
    pub file_name: String,
    pub content: String,
    pub file_type: String,
}

impl FileWrite {
    /// Build a write from path and content, deriving name and type.
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        let file_path = file_path.into();
        Self {
            file_name: file_name_from_path(&file_path).to_string(),
            file_type: infer_file_type(&file_path).to_string(),
            file_path,
            content: content.into(),
        }
    }
}

impl SaveFileRequest {
    /// Validate the request and fill in the display name and type tag.
    pub fn into_write(self) -> Result<FileWrite, CoreError> {
        validate_file_path(&self.file_path)?;
        validate_file_content(&self.content)?;

        let file_name = match self.file_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => file_name_from_path(&self.file_path).to_string(),
        };
        let file_type = match self.file_type {
            Some(kind) if !kind.trim().is_empty() => kind,
            _ => infer_file_type(&self.file_path).to_string(),
        };

        Ok(FileWrite {
            file_path: self.file_path,
            file_name,
            content: self.content,
            file_type,
        })
    }
}

/// Last path segment, used as the display name.
pub fn file_name_from_path(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
}

/// Map a file extension to a type tag.
pub fn infer_file_type(path: &str) -> &'static str {
    let name = file_name_from_path(path);
    let Some((_, ext)) = name.rsplit_once('.') else {
        return DEFAULT_FILE_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "json" => "json",
        "rs" => "rust",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "html" | "htm" => "html",
        "css" | "scss" => "css",
        "md" | "markdown" => "markdown",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "sql" => "sql",
        "sh" | "bash" => "shell",
        _ => DEFAULT_FILE_TYPE,
    }
}
