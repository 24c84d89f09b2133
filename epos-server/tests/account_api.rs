//! 认证与权限集成测试

mod common;

use common::{ROOT_PASSWORD, spawn_app};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let t = spawn_app().await;

    let (status, _, err) = t.send("GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["code"], 1001);

    let (status, _, err) = t.send("GET", "/api/orders", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["code"], 1004);

    let (status, _, body) = t.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn login_failures_do_not_reveal_users() {
    let t = spawn_app().await;

    for (user, password) in [("root", "wrong"), ("nobody", ROOT_PASSWORD)] {
        let (status, _, err) = t
            .send(
                "POST",
                "/api/account/login",
                None,
                Some(json!({ "userName": user, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], 1002);
        assert_eq!(err["message"], "Invalid login attempt");
    }
}

#[tokio::test]
async fn me_and_roles() {
    let t = spawn_app().await;

    let (status, me) = t.get("/api/account/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["userName"], "root");
    assert_eq!(me["email"], "root@email.ie");
    assert_eq!(me["roles"], json!(["sys.admin"]));
    assert!(me.get("passwordHash").is_none());

    let (status, roles) = t.get("/api/account/role").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roles.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn non_admin_cannot_manage_catalog_or_users() {
    let t = spawn_app().await;

    let (status, waiter) = t
        .post(
            "/api/user",
            json!({
                "userName": "waiter",
                "fullName": "Floor Staff",
                "email": "waiter@example.com",
                "password": "tables4all",
                "roles": ["touch.user"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{waiter}");
    assert_eq!(waiter["roles"], json!(["touch.user"]));
    let waiter_id = waiter["id"].as_i64().unwrap();

    // 快速登录
    let (status, _, login) = t
        .send(
            "POST",
            &format!("/api/account/login/{waiter_id}"),
            None,
            Some(json!({ "password": "tables4all" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{login}");
    let token = login["token"].as_str().unwrap().to_string();

    let (status, _, err) = t
        .send(
            "POST",
            "/api/products",
            Some(&token),
            Some(json!({ "name": "Soup", "price": 5.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["code"], 2001);

    let (status, _, _) = t.send("GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 订单只需登录
    let (status, _, _) = t.send("GET", "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, products) = t.send("GET", "/api/products", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_sets_password_and_duplicate_names_conflict() {
    let t = spawn_app().await;
    let body = json!({
        "userName": "cashier",
        "fullName": "Front Desk",
        "email": "cashier@example.com",
        "roles": ["touch.user"]
    });

    let (status, cashier) = t.post("/api/user", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let id = cashier["id"].as_i64().unwrap();

    let (status, err) = t.post("/api/user", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 8002);

    let (status, _, _) = t
        .send(
            "POST",
            &format!("/api/account/passw/{id}"),
            Some(&t.token),
            Some(json!({ "password": "till-open" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    t.login("cashier", "till-open").await;

    let (status, err) = t
        .post(
            "/api/user",
            json!({
                "userName": "ghost",
                "fullName": "Ghost",
                "email": "ghost@example.com",
                "roles": ["manager"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 8101);

    assert_eq!(t.delete(&format!("/api/user/{id}")).await, StatusCode::NO_CONTENT);
    assert_eq!(t.delete(&format!("/api/user/{id}")).await, StatusCode::NOT_FOUND);
}
