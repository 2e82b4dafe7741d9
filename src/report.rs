//! Text rendering of the comparison and the contextual analogies.

use crate::compare::Comparison;
use crate::decimal::format_decimal;
use crate::grounding::GroundedQuantity;
use crate::reference::ReferenceMatch;

pub fn comparison_lines(a: &GroundedQuantity, b: &GroundedQuantity, metrics: &Comparison) -> Vec<String> {
    vec![
        String::new(),
        "=== Comparison Result ===".to_string(),
        format!("{} ({}): {}", a.concept, a.unit, a.value),
        format!("{} ({}): {}", b.concept, b.unit, b.value),
        format!("A / B: {}", format_decimal(&metrics.ratio_ab)),
        format!("B / A: {}", format_decimal(&metrics.ratio_ba)),
        format!("Absolute difference: {}", format_decimal(&metrics.abs_diff)),
        format!("Percent difference: {}%", format_decimal(&metrics.pct_diff)),
        format!("Order-of-magnitude gap: {}", format_decimal(&metrics.magnitude_gap)),
    ]
}

pub fn context_header() -> Vec<String> {
    vec![
        String::new(),
        "=== Contextual Comparisons (with sources) ===".to_string(),
    ]
}

/// One heading line followed by one line per match.
pub fn match_lines(heading: &str, quantity: &GroundedQuantity, matches: &[ReferenceMatch<'_>]) -> Vec<String> {
    let mut lines = Vec::with_capacity(matches.len() + 1);
    lines.push(format!("{heading}:"));
    for m in matches {
        lines.push(format!(
            "- vs {} ({}): {} is {}x | source: {}",
            m.fact.name,
            m.fact.unit,
            quantity.value,
            format_decimal(&m.factor),
            m.fact.source_url
        ));
    }
    lines
}
