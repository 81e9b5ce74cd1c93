use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// Largest decimal exponent that still fits a `Decimal` mantissa.
const MAX_EXPONENT: u32 = 28;

/// Coerce user-entered text into a non-negative decimal.
///
/// Reads the longest numeric prefix (`"12abc"` is 12, `".5"` is 0.5,
/// `"1e3"` is 1000). Empty text, text without a numeric prefix, negative
/// values (including `-0`) and values outside the `Decimal` range all
/// become zero.
pub fn parse_number(input: &str) -> Decimal {
    let text = input.trim();
    let Some((mantissa, exponent)) = numeric_prefix(text) else {
        if !text.is_empty() {
            debug!(input = %input, "non-numeric input coerced to 0");
        }
        return Decimal::ZERO;
    };

    let value = mantissa
        .parse::<Decimal>()
        .ok()
        .and_then(|m| apply_exponent(m, exponent));

    match value {
        Some(v) if v.is_sign_negative() => {
            debug!(input = %input, "negative input coerced to 0");
            Decimal::ZERO
        }
        Some(v) => v,
        None => {
            debug!(input = %input, "out-of-range input coerced to 0");
            Decimal::ZERO
        }
    }
}

/// Split the leading number of `text` into its mantissa and decimal exponent.
fn numeric_prefix(text: &str) -> Option<(String, i32)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut mantissa = String::new();

    if let Some(&sign) = bytes.first() {
        if sign == b'-' {
            mantissa.push('-');
            pos += 1;
        } else if sign == b'+' {
            pos += 1;
        }
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &text[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > frac_start {
            frac_digits = &text[frac_start..end];
            pos = end;
        } else if !int_digits.is_empty() {
            // "5." reads as 5
            pos = frac_start;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    mantissa.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_digits);
    }

    let mut exponent = 0;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            // Exponents too large for i32 saturate and are rejected below.
            exponent = text[pos + 1..end].parse::<i32>().unwrap_or(i32::MAX);
        }
    }

    Some((mantissa, exponent))
}

fn apply_exponent(mantissa: Decimal, exponent: i32) -> Option<Decimal> {
    if exponent == 0 {
        return Some(mantissa);
    }
    let magnitude = exponent.unsigned_abs();
    if magnitude > MAX_EXPONENT {
        // Tiny values vanish; huge ones are out of range
        return if exponent < 0 { Some(Decimal::ZERO) } else { None };
    }
    let scale = Decimal::from_i128_with_scale(10_i128.pow(magnitude), 0);
    if exponent > 0 {
        mantissa.checked_mul(scale)
    } else {
        mantissa.checked_div(scale)
    }
}

/// Round a monetary value to exactly two decimal places, midpoint away from zero.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// `round2(a * b)`, or zero when the product leaves the `Decimal` range.
pub(crate) fn money_product(a: Decimal, b: Decimal) -> Decimal {
    match a.checked_mul(b) {
        Some(product) => round2(product),
        None => {
            warn!(%a, %b, "line amount overflowed, using 0");
            round2(Decimal::ZERO)
        }
    }
}

/// `round2(sum)`, or zero when the sum leaves the `Decimal` range.
pub(crate) fn money_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    let sum = values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v));
    match sum {
        Some(total) => round2(total),
        None => {
            warn!("sum overflowed, using 0");
            round2(Decimal::ZERO)
        }
    }
}

/// Fixed two-decimal text with a literal currency prefix, e.g. `$20.01`.
///
/// Values near the top of the `Decimal` range cannot hold scale 2, so the
/// text is padded rather than relying on the stored scale.
pub fn format_money(currency_symbol: &str, value: Decimal) -> String {
    format!("{}{:.2}", currency_symbol, round2(value))
}

/// Accept stored monetary values written as strings, numbers or empty text.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Text(String),
        Number(f64),
    }

    Ok(match Stored::deserialize(deserializer)? {
        Stored::Text(text) => parse_number(&text),
        Stored::Number(n) => parse_number(&n.to_string()),
    })
}
