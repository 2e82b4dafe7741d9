//! Ratio, difference, and magnitude metrics between two grounded values.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::decimal::{div_rounded, log10_distance, Decimal};
use crate::error::DomainError;

/// Ensures `value` can take part in ratio metrics. `label` names it in the error.
pub fn validate<'a>(value: &'a Decimal, label: &str) -> Result<&'a BigDecimal, DomainError> {
    let finite = value
        .as_finite()
        .ok_or_else(|| DomainError::NotFinite(label.to_string()))?;
    if finite.is_zero() {
        return Err(DomainError::Zero(label.to_string()));
    }
    Ok(finite)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub ratio_ab: BigDecimal,
    pub ratio_ba: BigDecimal,
    pub abs_diff: BigDecimal,
    /// Absolute difference over the mean magnitude, in percent.
    pub pct_diff: BigDecimal,
    /// `|log10(|a / b|)|`
    pub magnitude_gap: BigDecimal,
}

pub fn compare(a: &Decimal, b: &Decimal) -> Result<Comparison, DomainError> {
    let a = validate(a, "First value")?;
    let b = validate(b, "Second value")?;

    let ratio_ab = div_rounded(a, b);
    let ratio_ba = div_rounded(b, a);
    let abs_diff = (a - b).abs();
    let midpoint = div_rounded(&(a.abs() + b.abs()), &BigDecimal::new(BigInt::from(2), 0));
    if midpoint.is_zero() {
        return Err(DomainError::ZeroMidpoint);
    }
    let pct_diff = div_rounded(&abs_diff, &midpoint) * BigDecimal::new(BigInt::from(100), 0);
    let magnitude_gap =
        log10_distance(a, b).ok_or_else(|| DomainError::Zero("A / B".to_string()))?;

    Ok(Comparison {
        ratio_ab,
        ratio_ba,
        abs_diff,
        pct_diff,
        magnitude_gap,
    })
}
