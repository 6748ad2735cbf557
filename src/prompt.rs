// Operator prompts

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of free-text answers to questions asked of the operator
pub trait Prompt {
    /// Ask `question` and return the answer with surrounding whitespace removed
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Reads answers from stdin
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        print!("{}", question);
        io::stdout().flush().context("Failed to write prompt")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read answer from stdin")?;
        if read == 0 {
            anyhow::bail!("stdin closed before an answer was given");
        }

        Ok(line.trim().to_string())
    }
}

/// Answers queued up front, for non-interactive runs and tests
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .with_context(|| format!("No scripted answer for prompt: {}", question.trim()))
    }
}

/// Y/n answer with yes as the default
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}
