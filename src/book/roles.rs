use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::utils::console::Console;
use crate::Result;

/// Role of one contributor name. A single-performer book can have the same
/// person as both author and narrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookRole {
    Author,
    Narrator,
    Both,
    Undefined,
}

impl BookRole {
    pub fn from_answer(answer: &str) -> Self {
        match answer {
            "author" => BookRole::Author,
            "narrator" => BookRole::Narrator,
            "both" => BookRole::Both,
            _ => BookRole::Undefined,
        }
    }
}

/// Human-input capability injected into the processing pipeline, so batch
/// and test runs can substitute a scripted implementation.
pub trait RoleResolver: Send + Sync {
    fn resolve_role(&self, book_title: &str, person: &str) -> Result<BookRole>;

    fn request_missing_name(&self, book_title: &str, role_label: &str) -> Result<String>;
}

pub struct ConsolePrompter {
    console: Arc<Console>,
}

impl ConsolePrompter {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }
}

impl RoleResolver for ConsolePrompter {
    fn resolve_role(&self, book_title: &str, person: &str) -> Result<BookRole> {
        let question = format!(
            "'{}' is tagged as both author and narrator of '{}'. Which role applies?",
            person, book_title
        );

        let answer = self
            .console
            .choose(&question, &["author", "narrator", "both", "skip"])?;

        Ok(BookRole::from_answer(&answer))
    }

    fn request_missing_name(&self, book_title: &str, role_label: &str) -> Result<String> {
        let question = format!(
            "Enter the {} of '{}' (leave empty to skip):",
            role_label, book_title
        );

        Ok(self.console.ask(&question)?)
    }
}

/// Deterministic resolver for tests and unattended runs: answers are taken
/// from pre-loaded queues, exhausted queues fall back to skipping.
#[derive(Default)]
pub struct ScriptedRoles {
    roles: Mutex<VecDeque<BookRole>>,
    names: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedRoles {
    pub fn with_roles(roles: impl IntoIterator<Item = BookRole>) -> Self {
        Self {
            roles: Mutex::new(roles.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: Mutex::new(names.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoleResolver for ScriptedRoles {
    fn resolve_role(&self, _book_title: &str, _person: &str) -> Result<BookRole> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut roles = self.roles.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(roles.pop_front().unwrap_or(BookRole::Undefined))
    }

    fn request_missing_name(&self, _book_title: &str, _role_label: &str) -> Result<String> {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(names.pop_front().unwrap_or_default())
    }
}
