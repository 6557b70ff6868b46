use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use inkpost_application::{RoleAssignment, RoleSummary, SecurityAdminRepository};
use inkpost_core::{AppError, AppResult};
use inkpost_domain::{PERMISSION_CLAIM_TYPE, Permission, RoleId, RoleName, UserId};

/// Advisory lock key serializing baseline role assignment.
const BASELINE_ROLE_LOCK_KEY: i64 = 0x696e_6b70_6f73_7401;

/// PostgreSQL-backed repository for role administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    is_system: bool,
}

impl From<RoleRow> for RoleSummary {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: RoleId::from_uuid(row.id),
            name: row.name,
            is_system: row.is_system,
        }
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    user_id: uuid::Uuid,
    role_id: uuid::Uuid,
    role_name: String,
    assigned_at: String,
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleSummary>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, is_system
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(RoleSummary::from).collect())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleSummary>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, is_system
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        Ok(row.map(RoleSummary::from))
    }

    async fn create_role(&self, name: RoleName) -> AppResult<RoleSummary> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name, is_system)
            VALUES ($1, $2, false)
            RETURNING id, name, is_system
            "#,
        )
        .bind(RoleId::new().as_uuid())
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, name.as_str()))?;

        Ok(row.into())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }

    async fn ensure_system_role(
        &self,
        name: RoleName,
        permissions: &[Permission],
    ) -> AppResult<RoleSummary> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name, is_system)
            VALUES ($1, $2, true)
            ON CONFLICT (name) DO UPDATE
            SET is_system = true
            RETURNING id, name, is_system
            "#,
        )
        .bind(RoleId::new().as_uuid())
        .bind(name.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to ensure system role: {error}")))?;

        let mut inserted_claims = 0_u64;
        for permission in permissions {
            inserted_claims += sqlx::query(
                r#"
                INSERT INTO role_claims (role_id, claim_type, claim_value)
                VALUES ($1, $2, $3)
                ON CONFLICT (role_id, claim_type, claim_value) DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(PERMISSION_CLAIM_TYPE)
            .bind(permission.to_claim_value())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist system role claims: {error}"))
            })?
            .rows_affected();
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        debug!(
            role = row.name.as_str(),
            inserted_claims,
            "system role claims reconciled"
        );

        Ok(row.into())
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| map_assignment_error(error, user_id, role_id))?;

        Ok(())
    }

    async fn assign_baseline_role(
        &self,
        user_id: UserId,
        first_role: RoleId,
        fallback_role: RoleId,
    ) -> AppResult<Option<RoleId>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BASELINE_ROLE_LOCK_KEY)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock baseline role assignment: {error}"))
            })?;

        let already_member = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1)
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read memberships: {error}")))?;

        if already_member {
            return Ok(None);
        }

        let first_role_taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM user_roles WHERE role_id = $1)
            "#,
        )
        .bind(first_role.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read memberships: {error}")))?;

        let role_id = if first_role_taken {
            fallback_role
        } else {
            first_role
        };

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_assignment_error(error, user_id, role_id))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(Some(role_id))
    }

    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove role assignment: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role assignment '{user_id}:{role_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn list_role_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT
                user_roles.user_id,
                user_roles.role_id,
                roles.name AS role_name,
                to_char(user_roles.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS assigned_at
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
            ORDER BY user_roles.user_id, roles.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role assignments: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| RoleAssignment {
                user_id: UserId::from_uuid(row.user_id),
                role_id: RoleId::from_uuid(row.role_id),
                role_name: row.role_name,
                assigned_at: row.assigned_at,
            })
            .collect())
    }
}

fn map_assignment_error(error: sqlx::Error, user_id: UserId, role_id: RoleId) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!(
            "user '{user_id}' or role '{role_id}' was not found"
        ));
    }

    AppError::Internal(format!("failed to assign role: {error}"))
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}
