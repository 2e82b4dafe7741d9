//! Ground two quantities, compare them, and report; restart on bad values.

use anyhow::Result;
use tracing::{info, warn};

use crate::compare::compare;
use crate::console::Prompter;
use crate::error::DomainError;
use crate::grounding::{ground_quantity, GroundedQuantity};
use crate::oracle::ValueOracle;
use crate::reference::{top_matches, DEFAULT_MATCH_COUNT, REFERENCE_FACTS};
use crate::report;

/// Full report for two grounded quantities, or the reason they cannot be compared.
pub fn build_report(first: &GroundedQuantity, second: &GroundedQuantity) -> Result<Vec<String>, DomainError> {
    let metrics = compare(&first.value, &second.value)?;

    let mut lines = report::comparison_lines(first, second, &metrics);
    lines.extend(report::context_header());
    for (heading, quantity) in [("First number", first), ("Second number", second)] {
        let matches = top_matches(&quantity.value, &REFERENCE_FACTS, DEFAULT_MATCH_COUNT)?;
        lines.extend(report::match_lines(heading, quantity, &matches));
    }
    Ok(lines)
}

/// Runs grounding cycles until one produces a comparable pair, then prints
/// the report. A [`DomainError`] discards both quantities and starts over.
pub async fn run_session<O, P>(oracle: &O, prompter: &mut P) -> Result<()>
where
    O: ValueOracle + ?Sized,
    P: Prompter + ?Sized,
{
    let mut cycle = 1u32;
    loop {
        info!(cycle, "starting comparison cycle");

        prompter.say("");
        prompter.say("Let's establish your first number.");
        let first = ground_quantity(oracle, prompter, "first").await?;

        prompter.say("");
        prompter.say("Now let's establish your second number.");
        let second = ground_quantity(oracle, prompter, "second").await?;

        match build_report(&first, &second) {
            Ok(lines) => {
                for line in &lines {
                    prompter.say(line);
                }
                return Ok(());
            }
            Err(err) => {
                warn!(cycle, error = %err, "quantities not comparable");
                prompter.say(&format!("Error: {err}"));
                prompter.say("Restarting full comparison flow from the beginning.");
                cycle += 1;
            }
        }
    }
}
