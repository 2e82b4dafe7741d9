#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use big_comparator::console::Prompter;
use big_comparator::error::ConsoleError;
use big_comparator::oracle::{ChatMessage, OracleReply, ValueOracle};

/// Replays canned oracle replies and records every history it was shown.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, String>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedOracle {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(message.to_string())])),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().expect("lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().expect("lock").len()
    }
}

#[async_trait]
impl ValueOracle for ScriptedOracle {
    async fn propose(&self, history: &[ChatMessage]) -> Result<OracleReply> {
        self.seen.lock().expect("lock").push(history.to_vec());
        let next = self
            .replies
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| anyhow!("oracle script exhausted"))?;
        next.map(OracleReply::from_raw).map_err(|message| anyhow!(message))
    }
}

/// Answers prompts from a script and captures everything shown.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub said: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or(ConsoleError::InputClosed)
    }

    fn say(&mut self, text: &str) {
        self.said.push(text.to_string());
    }
}
