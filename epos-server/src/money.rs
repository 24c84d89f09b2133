//! 金额计算
//!
//! 所有行合计与汇总统一保留 2 位小数，四舍五入 (远离零)。
//! 数据库中以规范化 TEXT ("7.00") 存储。

use rust_decimal::prelude::*;

use crate::utils::AppError;

/// Maximum unit price accepted on input
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum quantity per line
pub const MAX_QUANTITY: i32 = 9999;

const MONEY_DP: u32 = 2;

/// Round to 2 decimal places, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// quantity × unit price, rounded
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    round_money(Decimal::from(quantity) * unit_price)
}

/// Sum of (already rounded) line totals
pub fn sum_totals<I>(totals: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_money(totals.into_iter().sum())
}

/// Equality at 2 decimal places
pub fn totals_match(a: Decimal, b: Decimal) -> bool {
    round_money(a) == round_money(b)
}

/// Canonical TEXT form for storage, always two decimals
pub fn to_storage(value: Decimal) -> String {
    let mut v = round_money(value);
    v.rescale(MONEY_DP);
    v.to_string()
}

/// More than 2 significant decimal places ("7.000" is fine, "0.335" is not)
pub fn exceeds_money_scale(value: Decimal) -> bool {
    value.normalize().scale() > MONEY_DP
}

/// 1..=9999
pub fn validate_quantity(quantity: i32, field: &str) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::invalid_field(
            field,
            format!("{field} must be between 1 and {MAX_QUANTITY}"),
        ));
    }
    Ok(())
}

/// 0..=1,000,000, at most 2 decimal places
pub fn validate_price(price: Decimal, field: &str) -> Result<(), AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::invalid_field(field, format!("{field} must not be negative")));
    }
    if exceeds_money_scale(price) {
        return Err(AppError::invalid_field(
            field,
            format!("{field} must have at most {MONEY_DP} decimal places"),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::invalid_field(
            field,
            format!("{field} must not exceed {MAX_PRICE}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(2, d("3.50")), d("7.00"));
        assert_eq!(line_total(3, d("0.335")), d("1.01"));
        // 0.125 * 1 -> 0.13 (half away from zero)
        assert_eq!(line_total(1, d("0.125")), d("0.13"));
    }

    #[test]
    fn test_sum_and_match() {
        let total = sum_totals([d("7.00"), d("2.25"), d("0.10")]);
        assert_eq!(total, d("9.35"));
        assert!(totals_match(d("9.35"), d("9.350")));
        assert!(!totals_match(d("9.35"), d("9.36")));
        assert_eq!(sum_totals(Vec::<Decimal>::new()), Decimal::ZERO);
    }

    #[test]
    fn test_storage_form() {
        assert_eq!(to_storage(d("7")), "7.00");
        assert_eq!(to_storage(d("3.5")), "3.50");
        assert_eq!(to_storage(d("1.005")), "1.01");
    }

    #[test]
    fn test_validation() {
        assert!(validate_quantity(1, "q").is_ok());
        assert!(validate_quantity(9999, "q").is_ok());
        assert!(validate_quantity(0, "q").is_err());
        assert!(validate_quantity(10_000, "q").is_err());
        assert!(validate_price(Decimal::ZERO, "p").is_ok());
        assert!(validate_price(MAX_PRICE, "p").is_ok());
        assert!(validate_price(d("-0.01"), "p").is_err());
        assert!(validate_price(d("1000000.01"), "p").is_err());
        assert!(validate_price(d("3.500"), "p").is_ok());
        assert!(validate_price(d("0.335"), "p").is_err());
        assert!(exceeds_money_scale(d("0.001")));
        assert!(!exceeds_money_scale(d("12")));
    }
}
