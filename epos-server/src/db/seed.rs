//! 启动时数据初始化
//!
//! 系统角色与 root 账户，均为幂等操作。

use shared::models::UserSave;
use sqlx::SqlitePool;

use crate::auth::password::hash_password;
use crate::auth::permissions::{SYS_ADMIN, SYSTEM_ROLES, get_default_permissions};
use crate::db::repository::{role, user};
use crate::utils::{AppError, AppResult};

pub const ROOT_USER_NAME: &str = "root";
const ROOT_EMAIL: &str = "root@email.ie";
const ROOT_FULL_NAME: &str = "root user";

/// Ensure `sys.admin`, `touch.user` and `guest` exist
pub async fn ensure_system_roles(pool: &SqlitePool) -> AppResult<()> {
    for (name, description) in SYSTEM_ROLES {
        let created =
            role::create_if_missing(pool, name, description, &get_default_permissions(name), true)
                .await?;
        if created {
            tracing::info!(role = %name, "Seeded system role");
        }
    }
    Ok(())
}

/// Ensure the `root` account exists and belongs to `sys.admin`
///
/// An existing root keeps its password.
pub async fn ensure_root_user(pool: &SqlitePool, password: &str) -> AppResult<()> {
    if let Some(existing) = user::find_by_name(pool, ROOT_USER_NAME).await? {
        if !existing.roles.iter().any(|r| r == SYS_ADMIN) {
            let mut roles = existing.roles.clone();
            roles.push(SYS_ADMIN.to_string());
            let mut conn = pool.acquire().await.map_err(db_error)?;
            user::replace_roles(&mut conn, existing.id, &roles).await?;
            tracing::info!("Restored sys.admin role on root user");
        }
        return Ok(());
    }

    let hash = hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let data = UserSave {
        id: None,
        user_name: ROOT_USER_NAME.to_string(),
        full_name: ROOT_FULL_NAME.to_string(),
        email: ROOT_EMAIL.to_string(),
        phone_number: None,
        password: None,
        is_active: Some(true),
        roles: vec![SYS_ADMIN.to_string()],
    };
    let root = user::save(pool, data, Some(hash)).await?;
    tracing::info!(user_id = root.id, "Seeded root user");
    Ok(())
}

fn db_error(e: sqlx::Error) -> AppError {
    crate::db::repository::RepoError::from(e).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let db = DbService::in_memory().await.unwrap();
        ensure_system_roles(&db.pool).await.unwrap();
        ensure_system_roles(&db.pool).await.unwrap();
        assert_eq!(role::find_all(&db.pool).await.unwrap().len(), 3);

        ensure_root_user(&db.pool, "first").await.unwrap();
        ensure_root_user(&db.pool, "second").await.unwrap();

        let users = user::find_all(&db.pool).await.unwrap();
        assert_eq!(users.len(), 1);
        let root = &users[0];
        assert_eq!(root.email, "root@email.ie");
        assert_eq!(root.roles, vec!["sys.admin".to_string()]);
        assert!(verify_password("first", &root.password_hash));
    }

    #[tokio::test]
    async fn test_system_role_permissions() {
        let db = DbService::in_memory().await.unwrap();
        ensure_system_roles(&db.pool).await.unwrap();
        let admin = role::find_by_name(&db.pool, "sys.admin").await.unwrap().unwrap();
        assert_eq!(admin.permissions, vec!["sys.admin".to_string()]);
        assert!(admin.is_system);
    }
}
