// Shared numeric conversion helpers used by the object model and the array builtins

use crate::core::{PreferredType, Realm, Value, to_primitive};
use crate::error::JSError;
use crate::unicode::utf16_to_utf8;
use num_traits::ToPrimitive;

/// 2^53 - 1, the upper bound of every length and index produced by `ToLength`.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

const TWO_32: f64 = 4_294_967_296.0; // 2^32

/// JS `ToNumber`. Objects go through `ToPrimitive` with hint number, which may run script code.
pub fn to_number(realm: &Realm, value: &Value) -> Result<f64, JSError> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::String(s) => Ok(string_to_number(s)),
        Value::Object(_) => {
            let prim = to_primitive(realm, value, PreferredType::Number)?;
            to_number(realm, &prim)
        }
    }
}

// WhiteSpace and LineTerminator code points. Unicode White_Space also has U+0085, which JS does not.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000b}'
            | '\u{000c}'
            | '\u{0020}'
            | '\u{00a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
            | '\u{000a}'
            | '\u{000d}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// `StringToNumber`: decimal literals, `Infinity`, and `0x`/`0o`/`0b` integers. Anything else is NaN.
pub fn string_to_number(s: &[u16]) -> f64 {
    let text = utf16_to_utf8(s);
    let text = text.trim_matches(is_js_whitespace);
    if text.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_radix_integer(digits, radix);
        }
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'+' => (1.0, &text[1..]),
        b'-' => (-1.0, &text[1..]),
        _ => (1.0, text),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }
    unsigned.parse::<f64>().map(|n| sign * n).unwrap_or(f64::NAN)
}

fn parse_radix_integer(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    acc
}

// StrUnsignedDecimalLiteral without the `Infinity` form: digits, an optional fraction and an
// optional exponent, with at least one digit in the mantissa.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return false;
        }
    }
    i == bytes.len()
}

/// JS `ToIntegerOrInfinity` for Number inputs
pub fn to_integer_or_infinity(n: f64) -> f64 {
    if n.is_nan() || n == 0.0 {
        return 0.0;
    }
    if n.is_infinite() {
        return n;
    }
    n.trunc()
}

/// JS `ToLength` for Number inputs: clamps into `[0, 2^53 - 1]`.
pub fn to_length(n: f64) -> u64 {
    let len = to_integer_or_infinity(n);
    if len <= 0.0 {
        return 0;
    }
    len.min(MAX_SAFE_INTEGER as f64).to_u64().unwrap_or(MAX_SAFE_INTEGER)
}

/// JS ToUint32 semantics for Number inputs
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0_u32;
    }
    let int = n.trunc();
    let u = ((int % TWO_32) + TWO_32) % TWO_32;
    u.to_u32().unwrap_or(0)
}

/// `Number::toString(10)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = n.abs();
    if !(1e-6..1e21).contains(&abs) {
        // Rust writes `1e21` / `1.5e-7`; JS wants an explicit sign on positive exponents.
        let s = format!("{n:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    format!("{n}")
}
