use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use tracing::warn;

use crate::error::{DatabaseError, DatabaseResult};

/// Round-trip `SELECT 1` to confirm the pool can reach the server.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    db.query_one_raw(Statement::from_string(db.get_database_backend(), "SELECT 1"))
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "PostgreSQL health check failed");
            DatabaseError::HealthCheckFailed(e.to_string())
        })
}
