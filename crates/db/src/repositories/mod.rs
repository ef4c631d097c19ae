//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that write a child row
//! and bump the parent project's `updated_at` run both statements in one
//! transaction.

pub mod conversation_repo;
pub mod project_file_repo;
pub mod project_repo;

pub use conversation_repo::ConversationRepo;
pub use project_file_repo::ProjectFileRepo;
pub use project_repo::ProjectRepo;
