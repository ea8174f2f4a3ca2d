//! Lenient number reading for form fields.
//!
//! Form values arrive as text, and users type `3rd` or `1500rs`. Both readers
//! take the longest leading number and ignore whatever follows it.

use serde_json::Value;

/// Reads the leading integer of a field, so a semester typed as `3rd` still
/// means 3.
#[expect(clippy::cast_possible_truncation, reason = "semesters are small, fractions are dropped")]
pub(crate) fn integer_prefix(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim_start();
            let sign = usize::from(s.starts_with(['+', '-']));
            let end = sign + leading_digits(&s[sign..]);
            s[..end].parse().ok()
        }
        _ => None,
    }
}

/// Reads the leading decimal number of `s`, with an optional fraction and
/// exponent: `"65000 "` is 65000 and `"1.5e3kg"` is 1500.
pub(crate) fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = usize::from(s.starts_with(['+', '-']));

    let mut digits = leading_digits(&s[end..]);
    end += digits;

    if s[end..].starts_with('.') {
        let fraction = leading_digits(&s[end + 1..]);
        digits += fraction;
        if digits > 0 {
            end += 1 + fraction;
        }
    }
    if digits == 0 {
        return None;
    }

    if s[end..].starts_with(['e', 'E']) {
        let rest = &s[end + 1..];
        let sign = usize::from(rest.starts_with(['+', '-']));
        let exponent = leading_digits(&rest[sign..]);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    s[..end].parse().ok()
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
