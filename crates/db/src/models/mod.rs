//! Row structs and insert inputs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus any input struct the repositories insert from.

pub mod conversation;
pub mod project;
pub mod project_file;
