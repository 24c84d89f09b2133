//! User Repository
//!
//! 用户与 user_role 关联。角色按名称分配，未知角色名拒绝。

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{User, UserSave};
use shared::util::snowflake_id;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, user_name, full_name, email, phone_number, password_hash, is_active";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("SELECT {COLUMNS} FROM user ORDER BY user_name");
    let mut users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;

    let pairs = sqlx::query_as::<_, (i64, String)>(
        "SELECT ur.user_id, r.name FROM user_role ur JOIN role r ON r.id = ur.role_id ORDER BY r.name",
    )
    .fetch_all(pool)
    .await?;
    let mut roles: HashMap<i64, Vec<String>> = HashMap::new();
    for (user_id, name) in pairs {
        roles.entry(user_id).or_default().push(name);
    }
    for user in &mut users {
        user.roles = roles.remove(&user.id).unwrap_or_default();
    }
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM user WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    with_roles(pool, user).await
}

/// Case-insensitive lookup (user_name is `COLLATE NOCASE`)
pub async fn find_by_name(pool: &SqlitePool, user_name: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM user WHERE user_name = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_name)
        .fetch_optional(pool)
        .await?;
    with_roles(pool, user).await
}

async fn with_roles(pool: &SqlitePool, user: Option<User>) -> RepoResult<Option<User>> {
    let Some(mut user) = user else {
        return Ok(None);
    };
    user.roles = sqlx::query_scalar::<_, String>(
        "SELECT r.name FROM user_role ur JOIN role r ON r.id = ur.role_id WHERE ur.user_id = ? ORDER BY r.name",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;
    Ok(Some(user))
}

/// Upsert a user and replace its role set in one transaction
///
/// `password_hash` is only written when `Some`; a new user without one
/// cannot log in until a password is set.
pub async fn save(
    pool: &SqlitePool,
    data: UserSave,
    password_hash: Option<String>,
) -> RepoResult<User> {
    let mut tx = pool.begin().await?;

    let mut updated_id = None;
    if let Some(id) = data.id {
        let rows = sqlx::query(
            "UPDATE user SET user_name = ?1, full_name = ?2, email = ?3, phone_number = ?4, \
             is_active = COALESCE(?5, is_active), password_hash = COALESCE(?6, password_hash) WHERE id = ?7",
        )
        .bind(&data.user_name)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.is_active)
        .bind(&password_hash)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if rows.rows_affected() > 0 {
            updated_id = Some(id);
        }
    }

    let id = match updated_id {
        Some(id) => id,
        None => {
            let id = snowflake_id();
            sqlx::query(
                "INSERT INTO user (id, user_name, full_name, email, phone_number, password_hash, is_active) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(&data.user_name)
            .bind(&data.full_name)
            .bind(&data.email)
            .bind(&data.phone_number)
            .bind(password_hash.unwrap_or_default())
            .bind(data.is_active.unwrap_or(true))
            .execute(&mut *tx)
            .await?;
            id
        }
    };

    replace_roles(&mut *tx, id, &data.roles).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to save user".into()))
}

/// Replace the user's roles with the named set
pub async fn replace_roles(
    conn: &mut SqliteConnection,
    user_id: i64,
    role_names: &[String],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM user_role WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    for name in role_names {
        let role_id = sqlx::query_scalar::<_, i64>("SELECT id FROM role WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| {
                RepoError::Business(ErrorCode::RoleNotFound, format!("Role '{name}' not found"))
            })?;
        sqlx::query("INSERT OR IGNORE INTO user_role (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn set_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE user SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// user_role 行由外键级联删除
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
