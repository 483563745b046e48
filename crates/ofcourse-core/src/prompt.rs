//! Interactive prompting capability.
//!
//! The deployment workflow only ever talks to the user through this trait;
//! the CLI supplies a terminal implementation and tests supply [`Scripted`].

use crate::error::{OfcourseError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

pub trait Prompter {
    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Ask for a line of visible input.
    fn input(&self, prompt: &str) -> Result<String>;

    /// Ask for hidden input (passwords).
    fn secret(&self, prompt: &str) -> Result<String>;
}

/// A scripted answer for [`Scripted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Text(String),
}

/// Replays a fixed list of answers and records every prompt it was shown.
/// Running out of answers, or getting the wrong kind, is a prompt error.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Every prompt shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| OfcourseError::Prompt(format!("no scripted answer for '{prompt}'")))
    }

    fn next_text(&self, prompt: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(s) => Ok(s),
            other => Err(OfcourseError::Prompt(format!(
                "expected text for '{prompt}', got {other:?}"
            ))),
        }
    }
}

impl Prompter for Scripted {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(b) => Ok(b),
            other => Err(OfcourseError::Prompt(format!(
                "expected confirmation for '{prompt}', got {other:?}"
            ))),
        }
    }

    fn input(&self, prompt: &str) -> Result<String> {
        self.next_text(prompt)
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        self.next_text(prompt)
    }
}
