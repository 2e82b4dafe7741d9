//! Arbitrary-precision decimal values and their human-facing text form.
//!
//! Input text may carry thousands separators and scientific notation.
//! Output switches to scientific notation outside `[1e-3, 1e9)`.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// Significant digits kept by division results.
pub const DIVISION_PRECISION: u64 = 50;
const MANTISSA_DIGITS: usize = 7;
/// Working digits for logarithms before rounding to [`DIVISION_PRECISION`].
const LOG_PRECISION: u64 = 64;
const MAX_EXPONENT: i64 = 999_999;

static FINITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)(?:([0-9]+)(?:\.([0-9]*))?|\.([0-9]+))(?:[eE]([+-]?[0-9]+))?$")
        .expect("invalid decimal regex")
});

static NON_FINITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([+-]?)(infinity|inf|nan)$").expect("invalid non-finite regex")
});

static SCIENTIFIC_ABOVE: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::new(BigInt::from(1), -9));
static SCIENTIFIC_BELOW: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::new(BigInt::from(1), 3));

// ln 2 = 2 atanh(1/3); ln 10 = 3 ln 2 + ln 1.25 = 3 ln 2 + 2 atanh(1/9)
static LN_2: Lazy<BigDecimal> = Lazy::new(|| atanh_doubled(&ratio(1, 3)));
static LN_10: Lazy<BigDecimal> =
    Lazy::new(|| (&*LN_2 * &integer(3) + atanh_doubled(&ratio(1, 9))).with_prec(LOG_PRECISION));

/// A signed decimal number, exact when finite.
#[derive(Debug, Clone, PartialEq)]
pub enum Decimal {
    Finite(BigDecimal),
    Infinity { negative: bool },
    NaN,
}

impl Decimal {
    /// Parses human-entered numeric text such as `"1,234.5"` or `"-2.5e-7"`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let cleaned: String = text.trim().chars().filter(|ch| *ch != ',').collect();
        if cleaned.is_empty() {
            return Err(ParseError::Empty);
        }
        if let Some(caps) = NON_FINITE_RE.captures(&cleaned) {
            if caps[2].eq_ignore_ascii_case("nan") {
                return Ok(Decimal::NaN);
            }
            return Ok(Decimal::Infinity {
                negative: &caps[1] == "-",
            });
        }
        parse_finite(&cleaned).map(Decimal::Finite)
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Decimal::Finite(_))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Decimal::Finite(value) if value.is_zero())
    }

    pub fn as_finite(&self) -> Option<&BigDecimal> {
        match self {
            Decimal::Finite(value) => Some(value),
            _ => None,
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::parse(s)
    }
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        Decimal::Finite(value)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimal::Finite(value) => f.write_str(&format_decimal(value)),
            Decimal::Infinity { negative: true } => f.write_str("-Infinity"),
            Decimal::Infinity { negative: false } => f.write_str("Infinity"),
            Decimal::NaN => f.write_str("NaN"),
        }
    }
}

fn parse_finite(literal: &str) -> Result<BigDecimal, ParseError> {
    let caps = FINITE_RE
        .captures(literal)
        .ok_or_else(|| ParseError::Malformed(literal.to_string()))?;

    let (whole, fraction) = match caps.get(4) {
        Some(fraction) => ("", fraction.as_str()),
        None => (
            caps.get(2).map_or("", |m| m.as_str()),
            caps.get(3).map_or("", |m| m.as_str()),
        ),
    };

    let out_of_range = || ParseError::ExponentOutOfRange(literal.to_string());
    let exponent: i64 = match caps.get(5) {
        Some(exp) => exp.as_str().parse().map_err(|_| out_of_range())?,
        None => 0,
    };
    if exponent.abs() > MAX_EXPONENT {
        return Err(out_of_range());
    }
    let scale = fraction.len() as i64 - exponent;

    let magnitude = BigInt::from_str(&format!("{whole}{fraction}"))
        .map_err(|_| ParseError::Malformed(literal.to_string()))?;
    let digits = if &caps[1] == "-" { -magnitude } else { magnitude };
    Ok(BigDecimal::new(digits, scale))
}

/// Renders `value` for display: `"0"`, plain decimal, or `d.ddddddE±x`.
pub fn format_decimal(value: &BigDecimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= *SCIENTIFIC_ABOVE || magnitude < *SCIENTIFIC_BELOW {
        scientific(value)
    } else {
        plain(value)
    }
}

/// `a / b` rounded to [`DIVISION_PRECISION`] significant digits. `b` must be nonzero.
pub fn div_rounded(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    (a / b).with_prec(DIVISION_PRECISION)
}

/// Base-10 logarithm of `|value|` to [`DIVISION_PRECISION`] significant
/// digits, or `None` for zero. Exact for powers of ten.
pub fn log10_abs(value: &BigDecimal) -> Option<BigDecimal> {
    if value.is_zero() {
        return None;
    }
    let (_, digits, scale) = decompose(value);
    let exponent = digits.len() as i64 - 1 - scale;
    // |value| = mantissa * 10^exponent with mantissa in [1, 10)
    let mantissa = BigDecimal::new(
        BigInt::from_str(&digits).ok()?,
        digits.len() as i64 - 1,
    );
    let fraction = (ln_mantissa(&mantissa) / &*LN_10).with_prec(LOG_PRECISION);
    Some((integer(exponent) + fraction).with_prec(DIVISION_PRECISION))
}

/// `|log10(|a| / |b|)|`, or `None` if either side is zero.
///
/// The larger magnitude is always divided by the smaller, so swapping `a`
/// and `b` gives the identical result and exact reciprocals tie exactly.
pub fn log10_distance(a: &BigDecimal, b: &BigDecimal) -> Option<BigDecimal> {
    if a.is_zero() || b.is_zero() {
        return None;
    }
    let (a, b) = (a.abs(), b.abs());
    let (larger, smaller) = if a >= b { (a, b) } else { (b, a) };
    log10_abs(&div_rounded(&larger, &smaller))
}

fn integer(n: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(n), 0)
}

fn ratio(numerator: i64, denominator: i64) -> BigDecimal {
    (&integer(numerator) / &integer(denominator)).with_prec(LOG_PRECISION)
}

/// Natural log of `m` in `[1, 10)`: halve into `[0.75, 1.5]`, then the atanh series.
fn ln_mantissa(m: &BigDecimal) -> BigDecimal {
    let one = integer(1);
    let limit = BigDecimal::new(BigInt::from(15), 1);
    let mut reduced = m.clone();
    let mut halvings = 0i64;
    while reduced > limit {
        reduced = &reduced / &integer(2);
        halvings += 1;
    }
    let z = ((&reduced - &one) / (&reduced + &one)).with_prec(LOG_PRECISION);
    (&*LN_2 * &integer(halvings) + atanh_doubled(&z)).with_prec(LOG_PRECISION)
}

/// `2 atanh(z) = ln((1 + z) / (1 - z))` for `|z| <= 1/3`.
fn atanh_doubled(z: &BigDecimal) -> BigDecimal {
    if z.is_zero() {
        return BigDecimal::zero();
    }
    let epsilon = BigDecimal::new(BigInt::from(1), LOG_PRECISION as i64 + 4);
    let z_squared = (z * z).with_prec(LOG_PRECISION);
    let mut power = z.clone();
    let mut sum = z.clone();
    let mut n = 1i64;
    loop {
        power = (&power * &z_squared).with_prec(LOG_PRECISION);
        let term = (&power / &integer(2 * n + 1)).with_prec(LOG_PRECISION);
        if term.abs() < epsilon {
            break;
        }
        sum += term;
        n += 1;
    }
    (sum * integer(2)).with_prec(LOG_PRECISION)
}

/// Sign, significant digits, and scale of `value` with trailing zeros removed.
fn decompose(value: &BigDecimal) -> (bool, String, i64) {
    let (int_val, scale) = value.normalized().as_bigint_and_exponent();
    (
        int_val.sign() == Sign::Minus,
        int_val.magnitude().to_string(),
        scale,
    )
}

fn plain(value: &BigDecimal) -> String {
    let (negative, digits, scale) = decompose(value);
    let sign = if negative { "-" } else { "" };
    if scale <= 0 {
        return format!("{sign}{digits}{}", "0".repeat(scale.unsigned_abs() as usize));
    }
    let scale = scale as usize;
    if digits.len() > scale {
        let (whole, fraction) = digits.split_at(digits.len() - scale);
        format!("{sign}{whole}.{fraction}")
    } else {
        format!("{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
    }
}

fn scientific(value: &BigDecimal) -> String {
    let (negative, digits, scale) = decompose(value);
    let mut exponent = digits.len() as i64 - 1 - scale;
    let (mantissa, carried) = round_half_even(&digits, MANTISSA_DIGITS);
    if carried {
        exponent += 1;
    }
    let (lead, rest) = mantissa.split_at(1);
    let sign = if negative { "-" } else { "" };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{lead}.{rest}E{exp_sign}{}", exponent.unsigned_abs())
}

/// Rounds a digit string to `keep` significant digits, ties to even.
/// The flag reports a carry into a new leading digit (`9999999|5` -> `1000000`).
fn round_half_even(digits: &str, keep: usize) -> (String, bool) {
    if digits.len() <= keep {
        return (format!("{:0<width$}", digits, width = keep), false);
    }
    let (kept, dropped) = digits.split_at(keep);
    let first = dropped.as_bytes()[0];
    let rest_nonzero = dropped.bytes().skip(1).any(|b| b != b'0');
    let last_odd = (kept.as_bytes()[keep - 1] - b'0') % 2 == 1;
    let round_up = first > b'5' || (first == b'5' && (rest_nonzero || last_odd));
    if !round_up {
        return (kept.to_string(), false);
    }

    let mut bytes = kept.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return (bytes.into_iter().map(char::from).collect(), false);
        }
    }
    (format!("1{}", "0".repeat(keep - 1)), true)
}
