use ethers::types::U256;
use serde_json::Value;

/// Fixed fractional precision for decimal amounts (wei per ETH).
const FRACTIONAL_DIGITS: usize = 18;

/// Normalize an arbitrary record field to an integral wei amount.
///
/// Hex strings parse as hex, integer decimal strings parse directly, and
/// fractional decimal strings are scaled to 18 fractional digits with exact
/// integer arithmetic (digits beyond that are truncated). Anything else,
/// including floats and negative numbers, normalizes to zero.
pub fn normalize_value(raw: Option<&Value>) -> U256 {
    match raw {
        Some(Value::Number(n)) => n.as_u64().map(U256::from).unwrap_or_default(),
        Some(Value::String(s)) => normalize_string(s),
        _ => U256::zero(),
    }
}

fn normalize_string(raw: &str) -> U256 {
    if let Some(digits) = raw.strip_prefix("0x") {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return U256::from_str_radix(digits, 16).unwrap_or_default();
        }
        return U256::zero();
    }

    if is_decimal_digits(raw) {
        return U256::from_dec_str(raw).unwrap_or_default();
    }

    if let Some((whole, frac)) = raw.split_once('.') {
        if is_decimal_digits(whole) && is_decimal_digits(frac) {
            return scale_fractional(whole, frac);
        }
    }

    U256::zero()
}

fn is_decimal_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

fn scale_fractional(whole: &str, frac: &str) -> U256 {
    let whole = match U256::from_dec_str(whole) {
        Ok(v) => v,
        Err(_) => return U256::zero(),
    };

    let mut frac_fixed = frac.to_string();
    frac_fixed.truncate(FRACTIONAL_DIGITS);
    while frac_fixed.len() < FRACTIONAL_DIGITS {
        frac_fixed.push('0');
    }
    let frac = U256::from_dec_str(&frac_fixed).unwrap_or_default();

    whole
        .checked_mul(U256::exp10(FRACTIONAL_DIGITS))
        .and_then(|scaled| scaled.checked_add(frac))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: &Value) -> U256 {
        normalize_value(Some(value))
    }

    #[test]
    fn test_hex_strings() {
        assert_eq!(normalize(&json!("0x3e8")), U256::from(1000u64));
        assert_eq!(normalize(&json!("0x0")), U256::zero());
        assert_eq!(normalize(&json!("0xzz")), U256::zero());
    }

    #[test]
    fn test_integer_strings() {
        assert_eq!(normalize(&json!("500000000000000")), U256::from(500_000_000_000_000u64));
        assert_eq!(normalize(&json!("0")), U256::zero());
    }

    #[test]
    fn test_fractional_strings() {
        assert_eq!(
            normalize(&json!("1.5")),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(normalize(&json!("0.0005")), U256::from(500_000_000_000_000u64));
        // digits beyond 18 are truncated, not rounded
        assert_eq!(
            normalize(&json!("0.0000000000000000019")),
            U256::from(1u64)
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(normalize(&json!(1000)), U256::from(1000u64));
        assert_eq!(normalize(&json!(-5)), U256::zero());
        assert_eq!(normalize(&json!(1.5)), U256::zero());
    }

    #[test]
    fn test_unparseable_is_zero() {
        assert_eq!(normalize(&json!("1.2.3")), U256::zero());
        assert_eq!(normalize(&json!(".5")), U256::zero());
        assert_eq!(normalize(&json!("1.")), U256::zero());
        assert_eq!(normalize(&json!("abc")), U256::zero());
        assert_eq!(normalize(&json!(null)), U256::zero());
        assert_eq!(normalize(&json!({ "x": 1 })), U256::zero());
        assert_eq!(normalize_value(None), U256::zero());
    }
}
