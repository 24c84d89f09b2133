//! 商品目录集成测试

mod common;

use common::{assert_money, spawn_app};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn category_crud_and_orphaned_products() {
    let t = spawn_app().await;

    let (status, drinks) = t
        .post("/api/categories", json!({ "name": "Drinks", "sortOrder": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{drinks}");
    let category_id = drinks["id"].as_i64().unwrap();
    assert_eq!(drinks["icon"], "");
    assert_eq!(drinks["isActive"], true);

    let (status, err) = t.post("/api/categories", json!({ "name": "Drinks" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 6102);

    let (status, product) = t
        .post(
            "/api/products",
            json!({ "name": "Lemonade", "price": 2.75, "categoryId": category_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{product}");
    assert_eq!(product["categoryName"], "Drinks");
    assert_money(&product["price"], 2.75);
    let product_id = product["id"].as_i64().unwrap();

    let (_, with_products) = t.get(&format!("/api/categories/{category_id}")).await;
    assert_eq!(with_products["products"][0]["id"].as_i64(), Some(product_id));

    // 更新 (upsert)
    let (status, renamed) = t
        .post(
            "/api/categories",
            json!({ "id": category_id, "name": "Cold Drinks" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["id"].as_i64(), Some(category_id));
    assert_eq!(renamed["name"], "Cold Drinks");
    assert_eq!(renamed["sortOrder"], 1);

    assert_eq!(t.delete(&format!("/api/categories/{category_id}")).await, StatusCode::NO_CONTENT);
    let (status, orphan) = t.get(&format!("/api/products/{product_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(orphan["categoryId"].is_null());

    let (status, err) = t.get(&format!("/api/categories/{category_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 6101);
}

#[tokio::test]
async fn product_validation() {
    let t = spawn_app().await;

    let (status, err) = t
        .post("/api/products", json!({ "name": "Caviar", "price": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["details"]["fields"], json!(["price"]));

    let (status, err) = t
        .post("/api/products", json!({ "name": " ", "price": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["details"]["fields"], json!(["name"]));

    let (status, err) = t
        .post(
            "/api/products",
            json!({ "name": "Tart", "price": 3, "categoryId": 12345 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 6101);

    assert_eq!(t.delete("/api/products/4242").await, StatusCode::NOT_FOUND);
}
