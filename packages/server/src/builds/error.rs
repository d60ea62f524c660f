use sea_orm::DbErr;
use uuid::Uuid;

/// Failures of the persistence layer behind the engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The build row disappeared between the engine's checks and the write.
    #[error("build {0} no longer exists")]
    Missing(Uuid),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Errors returned by `BuildEngine` operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("components not found: {}", join_ids(.0))]
    ComponentsNotFound(Vec<Uuid>),
    #[error("transaction failed: {0}")]
    TransactionFailure(String),
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl BuildError {
    pub(crate) fn build_not_found() -> Self {
        Self::NotFound("Build not found".into())
    }
}

impl From<StoreError> for BuildError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing(_) => Self::build_not_found(),
            StoreError::Db(e) => Self::TransactionFailure(e.to_string()),
        }
    }
}
