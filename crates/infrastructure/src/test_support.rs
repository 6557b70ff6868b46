use inkpost_domain::{RoleId, UserId};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects to `DATABASE_URL` and applies migrations, or returns `None` when unset.
pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tests: {error}");
    }

    Some(pool)
}

/// Role name unique enough for a shared test database.
pub(crate) fn unique_role_name(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..8])
}

pub(crate) async fn insert_user(pool: &PgPool, display_name: &str) -> UserId {
    let user_id = UserId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, display_name)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(display_name)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}

pub(crate) async fn insert_role(pool: &PgPool, name: &str) -> RoleId {
    let role_id = RoleId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO roles (id, name, is_system)
        VALUES ($1, $2, false)
        "#,
    )
    .bind(role_id.as_uuid())
    .bind(name)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    role_id
}
