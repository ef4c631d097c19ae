use crate::update::EmptyUpdate;

/// Errors from repository operations that do more than run one statement.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A partial update carried no fields; no statement was issued.
    #[error(transparent)]
    EmptyUpdate(#[from] EmptyUpdate),
}
