use rust_decimal::Decimal;

/// Percentage of `total` represented by `amount`, rounded to two decimal
/// places. A zero total yields zero instead of dividing by it, and a share
/// too large for a `Decimal` saturates at `Decimal::MAX`.
pub fn calculate_percentage(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    amount
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::MAX, |pct| pct.round_dp(2))
}

/// Render a percentage the way the spreadsheet stores it, e.g. `"33.33%"`.
pub fn format_percentage(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_amount() {
        assert_eq!(calculate_percentage(Decimal::ZERO, dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn test_half() {
        assert_eq!(calculate_percentage(dec!(50), dec!(100)), dec!(50.0));
    }

    #[test]
    fn test_zero_total_never_divides() {
        assert_eq!(calculate_percentage(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(calculate_percentage(dec!(123456.78), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_rounding_is_bankers() {
        // 1/8 = 12.5%; 1/800 = 0.125% rounds to the even neighbour
        assert_eq!(calculate_percentage(dec!(1), dec!(8)), dec!(12.5));
        assert_eq!(calculate_percentage(dec!(1), dec!(800)), dec!(0.12));
    }

    #[test]
    fn test_over_one_hundred() {
        assert_eq!(calculate_percentage(dec!(1100), dec!(1000)), dec!(110));
    }

    #[test]
    fn test_huge_share_saturates() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        assert_eq!(calculate_percentage(huge, dec!(0.01)), Decimal::MAX);
        assert_eq!(calculate_percentage(Decimal::MAX, Decimal::MAX), dec!(100));
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(60.00)), "60%");
        assert_eq!(format_percentage(dec!(33.33)), "33.33%");
        assert_eq!(format_percentage(dec!(12.50)), "12.5%");
        assert_eq!(format_percentage(dec!(-20)), "-20%");
    }
}
