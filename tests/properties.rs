use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use proptest::prelude::*;

use big_comparator::compare::compare;
use big_comparator::decimal::{format_decimal, Decimal};
use big_comparator::proposal::extract_proposal;
use big_comparator::reference::{top_matches, REFERENCE_FACTS};

fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn finite(text: &str) -> BigDecimal {
    Decimal::parse(text)
        .expect("decimal literal")
        .as_finite()
        .cloned()
        .expect("finite")
}

/// A nonzero value `±mantissa × 10^exponent`.
fn nonzero_value() -> impl Strategy<Value = BigDecimal> {
    (1i64..=999_999_999, -30i64..=30, any::<bool>()).prop_map(|(m, e, negative)| {
        let m = if negative { -m } else { m };
        BigDecimal::new(BigInt::from(m), -e)
    })
}

fn near(a: &BigDecimal, b: &BigDecimal, relative: &BigDecimal) -> bool {
    (a.clone() - b.clone()).abs() <= b.abs() * relative.clone()
}

proptest! {
    #[test]
    fn grouped_literals_round_trip_through_format(whole in 1u64..1_000_000_000, frac in 0u32..1000) {
        let text = format!("{}.{:03}", grouped(whole), frac);
        let parsed = Decimal::parse(&text).expect("grouped literal");
        let reparsed = Decimal::parse(&parsed.to_string()).expect("formatted literal");
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn short_mantissas_round_trip_through_scientific(m in 1i64..10_000_000, e in 9i64..40) {
        let value = Decimal::Finite(BigDecimal::new(BigInt::from(m), -e));
        let text = value.to_string();
        prop_assert!(text.contains('E'));
        prop_assert_eq!(Decimal::parse(&text).expect("formatted literal"), value);
    }

    #[test]
    fn notation_follows_the_magnitude_thresholds(value in nonzero_value()) {
        let magnitude = value.abs();
        let scientific = magnitude >= finite("1e9") || magnitude < finite("1e-3");
        prop_assert_eq!(format_decimal(&value).contains('E'), scientific);
    }

    #[test]
    fn text_without_a_number_marker_has_no_proposal(text in "[a-zA-Z0-9_=:., \n]{0,200}") {
        prop_assume!(!text.to_uppercase().contains("FINAL_NUMBER"));
        prop_assert_eq!(extract_proposal(&text), None);
    }

    #[test]
    fn comparison_is_antisymmetric(a in nonzero_value(), b in nonzero_value()) {
        let (a, b) = (Decimal::Finite(a), Decimal::Finite(b));
        let ab = compare(&a, &b).expect("comparable");
        let ba = compare(&b, &a).expect("comparable");
        let one = finite("1");
        let tolerance = finite("1e-40");

        prop_assert!(near(&(&ab.ratio_ab * &ba.ratio_ab), &one, &tolerance));
        prop_assert_eq!(&ab.ratio_ab, &ba.ratio_ba);
        prop_assert_eq!(&ab.abs_diff, &ba.abs_diff);
        prop_assert_eq!(&ab.pct_diff, &ba.pct_diff);
        prop_assert_eq!(&ab.magnitude_gap, &ba.magnitude_gap);
    }

    #[test]
    fn comparing_a_value_with_itself_is_neutral(a in nonzero_value()) {
        let a = Decimal::Finite(a);
        let metrics = compare(&a, &a).expect("comparable");
        let one = finite("1");
        let zero = finite("0");
        prop_assert_eq!(&metrics.ratio_ab, &one);
        prop_assert_eq!(&metrics.ratio_ba, &one);
        prop_assert_eq!(&metrics.pct_diff, &zero);
        prop_assert_eq!(&metrics.magnitude_gap, &zero);
    }

    #[test]
    fn top_matches_are_sorted_and_sized(value in nonzero_value(), k in 0usize..10) {
        let target = Decimal::Finite(value.clone());
        let matches = top_matches(&target, &REFERENCE_FACTS, k).expect("matches");
        prop_assert_eq!(matches.len(), k.min(REFERENCE_FACTS.len()));
        for pair in matches.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
        let tolerance = finite("1e-40");
        for m in &matches {
            let reference = m.fact.value.as_finite().expect("finite fact");
            prop_assert!(near(&(&m.factor * reference), &value, &tolerance));
        }
    }
}
