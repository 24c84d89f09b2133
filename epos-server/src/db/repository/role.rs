//! Role Repository

use super::RepoResult;
use shared::models::Role;
use shared::util::snowflake_id;
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT id, name, description, permissions, is_system FROM role ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, description, permissions, is_system FROM role WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(role)
}

/// Roles assigned to a user
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.description, r.permissions, r.is_system FROM role r \
         JOIN user_role ur ON ur.role_id = r.id WHERE ur.user_id = ? ORDER BY r.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

/// Insert a role unless one with the same name exists (seeding)
///
/// Returns `true` when a row was inserted.
pub async fn create_if_missing(
    pool: &SqlitePool,
    name: &str,
    description: &str,
    permissions: &[String],
    is_system: bool,
) -> RepoResult<bool> {
    let permissions_json =
        serde_json::to_string(permissions).unwrap_or_else(|_| "[]".to_string());
    let rows = sqlx::query(
        "INSERT INTO role (id, name, description, permissions, is_system) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(name) DO NOTHING",
    )
    .bind(snowflake_id())
    .bind(name)
    .bind(description)
    .bind(permissions_json)
    .bind(is_system)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
