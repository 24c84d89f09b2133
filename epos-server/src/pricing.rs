//! 行项目定价
//!
//! 订单与交易共用。先做输入校验 (不访问数据库)，再按 [`PricingPolicy`] 取价：
//!
//! - `Catalog`: 单价、名称取自当前商品目录；未知或停售商品拒绝
//! - `Client`: 采用客户端提交的单价，名称仍从目录快照 (若存在)
//!
//! 两种策略下行合计都由服务端重新计算，提交的 `totalPrice` 必须一致。

use std::collections::HashSet;

use rust_decimal::Decimal;
use shared::models::LineItemInput;
use sqlx::SqlitePool;

use crate::core::PricingPolicy;
use crate::db::repository::product;
use crate::money;
use crate::utils::{AppError, AppResult, ErrorCode};

/// A validated, priced line ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Structural checks on submitted lines, collecting every offending field
pub fn validate_lines(items: &[LineItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(
            AppError::with_message(ErrorCode::OrderEmpty, "At least one item is required")
                .with_fields(["items"]),
        );
    }

    let mut fields = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if money::validate_quantity(item.quantity, "quantity").is_err() {
            fields.push(format!("items[{i}].quantity"));
        }
        if let Some(price) = item.unit_price
            && money::validate_price(price, "unitPrice").is_err()
        {
            fields.push(format!("items[{i}].unitPrice"));
        }
        if let Some(total) = item.total_price
            && ((total.is_sign_negative() && !total.is_zero())
                || money::exceeds_money_scale(total))
        {
            fields.push(format!("items[{i}].totalPrice"));
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid line items: {}", fields.join(", ")))
            .with_fields(fields))
    }
}

/// Validate and price submitted lines according to `policy`
pub async fn price_lines(
    pool: &SqlitePool,
    policy: PricingPolicy,
    items: &[LineItemInput],
) -> AppResult<Vec<PricedLine>> {
    validate_lines(items)?;

    let ids: Vec<i64> = items
        .iter()
        .map(|i| i.product_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let catalog = product::find_map(pool, &ids).await?;

    let mut lines = Vec::with_capacity(items.len());
    let mut mismatched = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let current = catalog.get(&item.product_id);

        let (unit_price, product_name) = match policy {
            PricingPolicy::Catalog => {
                let p = current.ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ProductNotFound,
                        format!("Product {} not found", item.product_id),
                    )
                    .with_fields([format!("items[{i}].productId")])
                })?;
                if !p.is_active {
                    return Err(AppError::with_message(
                        ErrorCode::ProductInactive,
                        format!("Product '{}' is not active", p.name),
                    )
                    .with_fields([format!("items[{i}].productId")]));
                }
                (p.price, Some(p.name.clone()))
            }
            PricingPolicy::Client => {
                let price = item.unit_price.ok_or_else(|| {
                    AppError::invalid_field(
                        format!("items[{i}].unitPrice"),
                        "unitPrice is required",
                    )
                })?;
                (price, current.map(|p| p.name.clone()))
            }
        };

        let total_price = money::line_total(item.quantity, unit_price);
        if policy == PricingPolicy::Client
            && let Some(submitted) = item.total_price
            && !money::totals_match(submitted, total_price)
        {
            mismatched.push(format!("items[{i}].totalPrice"));
        }

        lines.push(PricedLine {
            product_id: item.product_id,
            product_name,
            quantity: item.quantity,
            unit_price,
            total_price,
        });
    }

    if !mismatched.is_empty() {
        return Err(AppError::validation(
            "Line total does not equal quantity × unitPrice",
        )
        .with_fields(mismatched));
    }

    Ok(lines)
}

/// Σ line totals
pub fn total_of(lines: &[PricedLine]) -> Decimal {
    money::sum_totals(lines.iter().map(|l| l.total_price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::ProductSave;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(product_id: i64, quantity: i32) -> LineItemInput {
        LineItemInput {
            product_id,
            quantity,
            unit_price: None,
            total_price: None,
        }
    }

    async fn seed_product(pool: &SqlitePool, name: &str, price: &str, active: bool) -> i64 {
        product::save(
            pool,
            ProductSave {
                id: None,
                name: name.into(),
                price: d(price),
                category_id: None,
                image_url: None,
                is_active: Some(active),
                sort_order: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[test]
    fn test_validate_lines_collects_fields() {
        let err = validate_lines(&[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);

        let mut bad_price = line(2, 1);
        bad_price.unit_price = Some(d("-1"));
        let err = validate_lines(&[line(1, 0), bad_price]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            err.details.unwrap()["fields"],
            serde_json::json!(["items[0].quantity", "items[1].unitPrice"])
        );
    }

    #[tokio::test]
    async fn test_client_policy_rejects_sub_cent_prices() {
        let db = DbService::in_memory().await.unwrap();

        let mut sub_cent = line(1, 3);
        sub_cent.unit_price = Some(d("0.335"));
        let mut sub_cent_total = line(1, 1);
        sub_cent_total.unit_price = Some(d("1.00"));
        sub_cent_total.total_price = Some(d("1.001"));

        let err = price_lines(&db.pool, PricingPolicy::Client, &[sub_cent, sub_cent_total])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            err.details.unwrap()["fields"],
            serde_json::json!(["items[0].unitPrice", "items[1].totalPrice"])
        );

        // trailing zeros are not extra precision
        let mut padded = line(1, 3);
        padded.unit_price = Some(d("0.330"));
        let lines = price_lines(&db.pool, PricingPolicy::Client, &[padded])
            .await
            .unwrap();
        assert_eq!(lines[0].total_price, lines[0].unit_price * Decimal::from(3));
    }

    #[tokio::test]
    async fn test_catalog_policy_uses_current_price() {
        let db = DbService::in_memory().await.unwrap();
        let p1 = seed_product(&db.pool, "Latte", "3.50", true).await;

        let mut submitted = line(p1, 2);
        submitted.unit_price = Some(d("0.01"));
        let lines = price_lines(&db.pool, PricingPolicy::Catalog, &[submitted])
            .await
            .unwrap();
        assert_eq!(lines[0].unit_price, d("3.50"));
        assert_eq!(lines[0].total_price, d("7.00"));
        assert_eq!(lines[0].product_name.as_deref(), Some("Latte"));
        assert_eq!(total_of(&lines), d("7.00"));
    }

    #[tokio::test]
    async fn test_catalog_policy_rejects_unknown_and_inactive() {
        let db = DbService::in_memory().await.unwrap();
        let retired = seed_product(&db.pool, "Old Blend", "2.00", false).await;

        let err = price_lines(&db.pool, PricingPolicy::Catalog, &[line(42, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);

        let err = price_lines(&db.pool, PricingPolicy::Catalog, &[line(retired, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInactive);
    }

    #[tokio::test]
    async fn test_client_policy_cross_checks_totals() {
        let db = DbService::in_memory().await.unwrap();

        let mut ok = line(7, 3);
        ok.unit_price = Some(d("1.10"));
        ok.total_price = Some(d("3.30"));
        let lines = price_lines(&db.pool, PricingPolicy::Client, &[ok.clone()])
            .await
            .unwrap();
        assert_eq!(lines[0].total_price, d("3.30"));
        assert_eq!(lines[0].product_name, None);

        let mut wrong = ok;
        wrong.total_price = Some(d("3.00"));
        let err = price_lines(&db.pool, PricingPolicy::Client, &[wrong])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            err.details.unwrap()["fields"],
            serde_json::json!(["items[0].totalPrice"])
        );

        let err = price_lines(&db.pool, PricingPolicy::Client, &[line(7, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.details.unwrap()["fields"], serde_json::json!(["items[0].unitPrice"]));
    }
}
