//! Sourced real-world quantities and closest-magnitude matching against them.

use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;

use crate::compare::validate;
use crate::decimal::{div_rounded, log10_distance, Decimal};
use crate::error::DomainError;

pub const DEFAULT_MATCH_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFact {
    pub name: &'static str,
    pub value: Decimal,
    pub unit: &'static str,
    pub source_url: &'static str,
}

const RAW_FACTS: [(&str, &str, &str, &str); 7] = [
    (
        "Mass of the Eiffel Tower",
        "10100000",
        "kg",
        "https://www.toureiffel.paris/en/the-monument/key-figures",
    ),
    (
        "Mass of the Titanic",
        "52310000",
        "kg",
        "https://www.britannica.com/topic/Titanic",
    ),
    (
        "Average Earth-Moon distance",
        "384400000",
        "m",
        "https://science.nasa.gov/moon/facts/",
    ),
    (
        "Approximate stars in the observable universe",
        "200000000000000000000000",
        "count",
        "https://esahubble.org/science/galaxies/",
    ),
    (
        "Seconds in one year",
        "31557600",
        "s",
        "https://www.nist.gov/pml/time-and-frequency-division/time-realization/leap-seconds",
    ),
    (
        "Estimated grains of sand on Earth",
        "7500000000000000000",
        "count",
        "https://www.npr.org/sections/krulwich/2012/11/05/164567572/which-is-greater-the-number-of-sand-grains-on-earth-or-stars-in-the-sky",
    ),
    (
        "Mass of Earth",
        "5.9722e24",
        "kg",
        "https://nssdc.gsfc.nasa.gov/planetary/factsheet/earthfact.html",
    ),
];

/// The built-in table, in display order.
pub static REFERENCE_FACTS: Lazy<Vec<ReferenceFact>> = Lazy::new(|| {
    RAW_FACTS
        .iter()
        .map(|&(name, value, unit, source_url)| ReferenceFact {
            name,
            value: Decimal::parse(value).expect("invalid reference fact literal"),
            unit,
            source_url,
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMatch<'a> {
    pub fact: &'a ReferenceFact,
    /// `value / fact.value`
    pub factor: BigDecimal,
    /// `|log10(|factor|)|`
    pub distance: BigDecimal,
}

/// The `k` facts closest to `value` in log-magnitude, nearest first.
///
/// Ties keep table order. A zero or non-finite `value`, or such a fact, is
/// rejected with a [`DomainError`].
pub fn top_matches<'a>(
    value: &Decimal,
    facts: &'a [ReferenceFact],
    k: usize,
) -> Result<Vec<ReferenceMatch<'a>>, DomainError> {
    let value = validate(value, "Value")?;

    let mut scored = facts
        .iter()
        .map(|fact| -> Result<ReferenceMatch<'a>, DomainError> {
            let reference = validate(&fact.value, fact.name)?;
            let factor = div_rounded(value, reference);
            let distance = log10_distance(value, reference)
                .ok_or_else(|| DomainError::Zero(fact.name.to_string()))?;
            Ok(ReferenceMatch {
                fact,
                factor,
                distance,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    scored.sort_by(|a, b| a.distance.cmp(&b.distance));
    scored.truncate(k);
    Ok(scored)
}
