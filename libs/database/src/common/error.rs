/// Error type for connection management and health probing.
///
/// Query errors inside repositories stay as `sea_orm::DbErr` and are mapped
/// by each domain into its own error enum.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
