//! Display Formatting
//!
//! Number and currency helpers for tables and cards.

/// Group thousands with commas: 1234567 -> "1,234,567"
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "$1,234.50"; negative values keep the sign in front
pub fn currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, thousands(cents / 100), cents % 100)
}

/// Unit price with up to 4 decimals, trailing zeros dropped
pub fn unit_price(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("${}", s)
}

/// "2025-04" style label
pub fn period(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(0.004), "$0.00");
        assert_eq!(currency(-12.0), "-$12.00");
    }

    #[test]
    fn test_unit_price_trims() {
        assert_eq!(unit_price(0.125), "$0.125");
        assert_eq!(unit_price(2.0), "$2");
        assert_eq!(unit_price(0.00004), "$0");
    }
}
