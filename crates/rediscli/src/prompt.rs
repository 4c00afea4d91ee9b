// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive input.
//!
//! The session reads everything through [`Prompter`], so the same state
//! machine runs against a terminal or a fixed script.

use std::collections::VecDeque;

use rediscli_core::RediscliError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::SecretString;

/// Source of user input. `Ok(None)` means the user ended input
/// (Ctrl+D, Ctrl+C, or the script ran out).
pub trait Prompter {
    /// Read one visible line, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, RediscliError>;

    /// Read one line with echo disabled.
    fn read_secret(&mut self, prompt: &str) -> Result<Option<SecretString>, RediscliError>;
}

/// Terminal input with line editing and history.
pub struct TerminalPrompter {
    editor: DefaultEditor,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self, RediscliError> {
        let editor = DefaultEditor::new()
            .map_err(|e| RediscliError::Internal(format!("failed to initialize readline: {e}")))?;
        Ok(Self { editor })
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, RediscliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(RediscliError::Prompt(format!("failed to read input: {e}"))),
        }
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<SecretString>, RediscliError> {
        rediscli_vault::prompt::read_hidden(prompt).map(Some)
    }
}

/// Replays a fixed list of answers, recording every prompt it was shown.
///
/// Secrets and visible lines come from the same queue, in order.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Every prompt shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, RediscliError> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<SecretString>, RediscliError> {
        self.read_line(prompt).map(|line| line.map(SecretString::from))
    }
}

/// Ask until `parse` accepts the answer, reporting each rejection through
/// `on_invalid`.
pub fn ask<P, T, F>(
    prompter: &mut P,
    prompt: &str,
    mut parse: F,
    on_invalid: &mut dyn FnMut(&RediscliError) -> Result<(), RediscliError>,
) -> Result<Option<T>, RediscliError>
where
    P: Prompter + ?Sized,
    F: FnMut(&str) -> Result<T, RediscliError>,
{
    loop {
        let Some(answer) = prompter.read_line(prompt)? else {
            return Ok(None);
        };
        match parse(answer.trim()) {
            Ok(value) => return Ok(Some(value)),
            Err(err @ RediscliError::Validation(_)) => on_invalid(&err)?,
            Err(err) => return Err(err),
        }
    }
}

/// `y`/`yes` or `n`/`no`, case-insensitive. Empty means no.
pub fn parse_yes_no(answer: &str) -> Result<bool, RediscliError> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "" | "n" | "no" => Ok(false),
        _ => Err(RediscliError::Validation("please answer y or n".to_string())),
    }
}
