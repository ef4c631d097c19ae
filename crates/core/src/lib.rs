//! Domain types, validation, and prompt assembly shared by the persistence
//! layer, the AI gateway, and the HTTP handlers.

pub mod chat;
pub mod error;
pub mod files;
pub mod project;
pub mod templates;
pub mod types;
pub mod validation;
