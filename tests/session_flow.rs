mod common;

use big_comparator::session::run_session;

use common::{ScriptedOracle, ScriptedPrompter};

const ANY_PROPOSAL: &str = "Here is my estimate.\nFINAL_NUMBER=1\nFINAL_UNIT=kg";

fn line_starting<'a>(lines: &'a [String], prefix: &str) -> &'a str {
    lines
        .iter()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with {prefix:?} in {lines:#?}"))
}

#[tokio::test]
async fn manual_overrides_produce_the_full_report() {
    let oracle = ScriptedOracle::new([ANY_PROPOSAL, ANY_PROPOSAL]);
    let mut prompter = ScriptedPrompter::new([
        "Eiffel Tower",
        "10100000",
        "kg",
        "Titanic",
        "52310000",
        "kg",
    ]);

    run_session(&oracle, &mut prompter).await.expect("session");
    let said = &prompter.said;

    assert_eq!(said[1], "Let's establish your first number.");
    assert!(said.iter().any(|l| l == "Now let's establish your second number."));
    assert!(said.iter().any(|l| l == "Eiffel Tower (kg): 10100000"));
    assert!(said.iter().any(|l| l == "Titanic (kg): 52310000"));
    assert!(line_starting(said, "A / B: ").starts_with("A / B: 0.193"));
    assert!(line_starting(said, "B / A: ").starts_with("B / A: 5.179"));
    assert_eq!(
        line_starting(said, "Absolute difference: "),
        "Absolute difference: 42210000"
    );
    let pct = line_starting(said, "Percent difference: ");
    assert!(pct.starts_with("Percent difference: 135.26"));
    assert!(pct.ends_with('%'));
    assert!(line_starting(said, "Order-of-magnitude gap: ").starts_with("Order-of-magnitude gap: 0.714"));

    let first_heading = said
        .iter()
        .position(|l| l == "First number:")
        .expect("first heading");
    assert_eq!(
        said[first_heading + 1],
        "- vs Mass of the Eiffel Tower (kg): 10100000 is 1x | source: https://www.toureiffel.paris/en/the-monument/key-figures"
    );
    let second_heading = said
        .iter()
        .position(|l| l == "Second number:")
        .expect("second heading");
    assert_eq!(second_heading - first_heading, 5);
    assert!(said[second_heading + 1].starts_with("- vs Mass of the Titanic (kg): 52310000 is 1x"));
    assert_eq!(said.len(), second_heading + 5);
    assert_eq!(prompter.remaining(), 0);
}

#[tokio::test]
async fn zero_value_restarts_both_groundings() {
    let oracle = ScriptedOracle::new([ANY_PROPOSAL; 4]);
    let mut prompter = ScriptedPrompter::new([
        "nothing at all",
        "0",
        "",
        "Titanic",
        "y",
        "Eiffel Tower",
        "y",
        "Titanic",
        "2",
        "kg",
    ]);

    run_session(&oracle, &mut prompter).await.expect("session");
    let said = &prompter.said;

    let error_at = said
        .iter()
        .position(|l| l == "Error: First value is zero, and ratio metrics would fail.")
        .expect("domain error shown");
    assert_eq!(
        said[error_at + 1],
        "Restarting full comparison flow from the beginning."
    );
    assert_eq!(
        said.iter()
            .filter(|l| *l == "Let's establish your first number.")
            .count(),
        2
    );
    assert_eq!(
        prompter
            .prompts
            .iter()
            .filter(|p| *p == "Enter first concept: ")
            .count(),
        2
    );
    assert!(said.iter().any(|l| l == "Eiffel Tower (kg): 1"));
    assert!(said.iter().any(|l| l == "A / B: 0.5"));
    assert_eq!(oracle.calls(), 4);
}

#[tokio::test]
async fn non_finite_override_is_a_domain_error() {
    let oracle = ScriptedOracle::new([ANY_PROPOSAL; 4]);
    let mut prompter = ScriptedPrompter::new([
        "a", "y", "b", "Infinity", "", "c", "y", "d", "y",
    ]);

    run_session(&oracle, &mut prompter).await.expect("session");

    assert!(prompter
        .said
        .iter()
        .any(|l| l == "Error: Second value is not finite."));
    assert!(prompter.said.iter().any(|l| l == "A / B: 1"));
}

#[tokio::test]
async fn transport_failure_aborts_the_session() {
    let oracle = ScriptedOracle::failing("503 Service Unavailable");
    let mut prompter = ScriptedPrompter::new(["Eiffel Tower"]);

    let err = run_session(&oracle, &mut prompter)
        .await
        .expect_err("fatal");
    assert!(err.to_string().contains("503"));
    assert!(!prompter.said.iter().any(|l| l.starts_with("Error:")));
}
