//! Permission Definitions
//!
//! 角色与权限同名：角色 `sys.admin` 授予权限 `sys.admin`，依此类推。
//!
//! - `sys.admin`: 后台管理 (商品目录、用户、密码)
//! - `touch.user`: POS 触屏终端
//! - `guest`: 扫码点餐访客

/// 系统管理员权限 (拥有所有权限)
pub const SYS_ADMIN: &str = "sys.admin";

/// POS 触屏终端权限
pub const TOUCH_USER: &str = "touch.user";

/// 访客权限
pub const GUEST: &str = "guest";

/// 启动时确保存在的系统角色: (名称, 描述)
pub const SYSTEM_ROLES: &[(&str, &str)] = &[
    (SYS_ADMIN, "System administrator"),
    (TOUCH_USER, "Touch screen POS user"),
    (GUEST, "Guest"),
];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    match role_name {
        SYS_ADMIN | TOUCH_USER | GUEST => vec![role_name.to_string()],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_roles_grant_same_named_permission() {
        for (name, _) in SYSTEM_ROLES {
            assert_eq!(get_default_permissions(name), vec![name.to_string()]);
        }
        assert!(get_default_permissions("waiter").is_empty());
    }
}
