//! Turns a free-form concept into a confirmed value and unit by talking
//! to the oracle until the user accepts a proposal or types their own number.

use anyhow::Result;
use tracing::{debug, info};

use crate::console::Prompter;
use crate::decimal::Decimal;
use crate::oracle::{ChatMessage, OracleReply, ValueOracle};
use crate::proposal::{Proposal, DEFAULT_UNIT};

pub const CONFIRM_PROMPT: &str =
    "Type 'y' to accept, 'n' to continue chatting, or type a number to override: ";
pub const CORRECTION_PROMPT: &str = "Tell AI what to correct: ";
pub const OVERRIDE_UNIT_PROMPT: &str = "Unit for your override value: ";
pub const REPLY_PROMPT: &str = "You: ";
pub const INVALID_OVERRIDE_NOTICE: &str = "Invalid override value. Continuing conversation.";
pub const RETRY_REQUEST: &str =
    "Your proposed final number format was invalid; please retry with valid numeric FINAL_NUMBER.";

/// A value the user has signed off on.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedQuantity {
    pub value: Decimal,
    pub unit: String,
    pub concept: String,
}

/// How the user answered a proposal.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    Accept,
    Reject,
    Override(Decimal),
    Invalid,
}

pub fn interpret_confirmation(answer: &str) -> Confirmation {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("y") {
        return Confirmation::Accept;
    }
    if answer.eq_ignore_ascii_case("n") {
        return Confirmation::Reject;
    }
    match Decimal::parse(answer) {
        Ok(value) => Confirmation::Override(value),
        Err(_) => Confirmation::Invalid,
    }
}

enum State {
    AwaitingConcept,
    Conversing,
    ProposalPending { raw: String, proposal: Proposal },
}

/// Runs one grounding conversation. `label` names the quantity in prompts
/// (`"first"`, `"second"`).
///
/// History lives only for the duration of this call. Oracle and console
/// failures propagate; malformed oracle output and malformed user input are
/// recovered by continuing the conversation.
pub async fn ground_quantity<O, P>(
    oracle: &O,
    prompter: &mut P,
    label: &str,
) -> Result<GroundedQuantity>
where
    O: ValueOracle + ?Sized,
    P: Prompter + ?Sized,
{
    let mut concept = String::new();
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut state = State::AwaitingConcept;

    loop {
        state = match state {
            State::AwaitingConcept => {
                concept = prompter
                    .ask_line(&format!("Enter {label} concept: "))
                    .await?;
                if concept.is_empty() {
                    State::AwaitingConcept
                } else {
                    history.push(ChatMessage::user(concept.clone()));
                    State::Conversing
                }
            }

            State::Conversing => {
                debug!(label, turns = history.len(), "asking oracle");
                let OracleReply {
                    raw,
                    display,
                    proposal,
                } = oracle.propose(&history).await?;
                if !display.is_empty() {
                    prompter.say(&format!("AI: {display}"));
                }

                match proposal {
                    Some(proposal) => {
                        prompter.say(&format!(
                            "Proposed {label} value: {} {}",
                            proposal.value, proposal.unit
                        ));
                        State::ProposalPending { raw, proposal }
                    }
                    None => {
                        let reply = prompter.ask_line(REPLY_PROMPT).await?;
                        history.push(ChatMessage::assistant(raw));
                        history.push(ChatMessage::user(reply));
                        State::Conversing
                    }
                }
            }

            State::ProposalPending { raw, proposal } => {
                let answer = prompter.ask_line(CONFIRM_PROMPT).await?;
                match interpret_confirmation(&answer) {
                    Confirmation::Accept => {
                        debug!(label, "proposal accepted");
                        return Ok(GroundedQuantity {
                            value: proposal.value,
                            unit: proposal.unit,
                            concept,
                        });
                    }
                    Confirmation::Reject => {
                        let correction = prompter.ask_line(CORRECTION_PROMPT).await?;
                        history.push(ChatMessage::assistant(raw));
                        history.push(ChatMessage::user(correction));
                        State::Conversing
                    }
                    Confirmation::Override(value) => {
                        let unit = prompter.ask_line(OVERRIDE_UNIT_PROMPT).await?;
                        let unit = if unit.is_empty() {
                            DEFAULT_UNIT.to_string()
                        } else {
                            unit
                        };
                        info!(
                            label,
                            discarded_turns = history.len(),
                            proposed = %proposal.value,
                            overridden = %value,
                            "manual override accepted"
                        );
                        return Ok(GroundedQuantity {
                            value,
                            unit,
                            concept,
                        });
                    }
                    Confirmation::Invalid => {
                        prompter.say(INVALID_OVERRIDE_NOTICE);
                        history.push(ChatMessage::assistant(raw));
                        history.push(ChatMessage::user(RETRY_REQUEST));
                        State::Conversing
                    }
                }
            }
        };
    }
}
