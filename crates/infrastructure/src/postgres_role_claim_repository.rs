use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use inkpost_application::{RoleClaim, RoleClaimRepository, RoleMembershipRepository};
use inkpost_core::{AppError, AppResult};
use inkpost_domain::{RoleId, UserId};

/// PostgreSQL-backed repository for role claims and role memberships.
#[derive(Clone)]
pub struct PostgresRoleClaimRepository {
    pool: PgPool,
}

impl PostgresRoleClaimRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_role_exists(&self, role_id: RoleId) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        if !exists {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct RoleClaimRow {
    claim_type: String,
    claim_value: String,
}

#[async_trait]
impl RoleClaimRepository for PostgresRoleClaimRepository {
    async fn list_role_claims(&self, role_id: RoleId) -> AppResult<Vec<RoleClaim>> {
        self.ensure_role_exists(role_id).await?;

        let rows = sqlx::query_as::<_, RoleClaimRow>(
            r#"
            SELECT claim_type, claim_value
            FROM role_claims
            WHERE role_id = $1
            ORDER BY id
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role claims: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| RoleClaim::new(row.claim_type, row.claim_value))
            .collect())
    }

    async fn insert_role_claim(&self, role_id: RoleId, claim: RoleClaim) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_claims (role_id, claim_type, claim_value)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(claim.claim_type.as_str())
        .bind(claim.claim_value.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| map_claim_insert_error(error, role_id, &claim))?;

        Ok(())
    }

    async fn delete_role_claims(
        &self,
        role_id: RoleId,
        claim_type: &str,
        claim_values: &[String],
    ) -> AppResult<u64> {
        self.ensure_role_exists(role_id).await?;

        let rows_affected = sqlx::query(
            r#"
            DELETE FROM role_claims
            WHERE role_id = $1
                AND claim_type = $2
                AND claim_value = ANY($3)
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(claim_type)
        .bind(claim_values)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role claims: {error}")))?
        .rows_affected();

        debug!(%role_id, claim_type, rows_affected, "deleted role claims");
        Ok(rows_affected)
    }
}

#[async_trait]
impl RoleMembershipRepository for PostgresRoleClaimRepository {
    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        let role_ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT role_id
            FROM user_roles
            WHERE user_id = $1
            ORDER BY role_id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        Ok(role_ids.into_iter().map(RoleId::from_uuid).collect())
    }
}

fn map_claim_insert_error(error: sqlx::Error, role_id: RoleId, claim: &RoleClaim) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(format!(
                    "role '{role_id}' already holds claim '{}:{}'",
                    claim.claim_type, claim.claim_value
                ));
            }
            Some("23503") => {
                return AppError::NotFound(format!("role '{role_id}' was not found"));
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to insert role claim: {error}"))
}
