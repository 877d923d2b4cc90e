//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything.
//! Results are matched by command-line prefix; unmatched commands succeed.
//!
//! # Example
//!
//! ```
//! use lunex_setup::shell::{CommandRunner, Invocation, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.queue_exit_codes("git submodule update", vec![1, 0]);
//!
//! let inv = Invocation::new("git", ["submodule", "update", "--init"]);
//! assert!(!runner.succeeds(&inv));
//! assert!(runner.succeeds(&inv));
//! assert_eq!(runner.count("git submodule update"), 2);
//! ```

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use crate::error::{Result, SetupError};

use super::command::{CommandResult, CommandRunner, Invocation};

type Effect = Box<dyn Fn(&Invocation)>;

struct Rule {
    prefix: String,
    results: VecDeque<CommandResult>,
    fallback: Option<CommandResult>,
    effect: Option<Effect>,
}

/// Mock runner that records invocations and returns scripted results.
#[derive(Default)]
pub struct MockRunner {
    rules: RefCell<Vec<Rule>>,
    missing_tools: RefCell<HashSet<String>>,
    calls: RefCell<Vec<Invocation>>,
}

fn result_for(code: i32, stdout: &str) -> CommandResult {
    if code == 0 {
        CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
    } else {
        CommandResult::failure(
            Some(code),
            stdout.to_string(),
            format!("mock failure ({})", code),
            Duration::ZERO,
        )
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command starting with `prefix` exits with `code`.
    pub fn set_exit_code(&self, prefix: &str, code: i32) {
        self.set_output(prefix, code, "");
    }

    /// Every command starting with `prefix` exits with `code` and prints `stdout`.
    pub fn set_output(&self, prefix: &str, code: i32, stdout: &str) {
        let mut rules = self.rules.borrow_mut();
        match rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => rule.fallback = Some(result_for(code, stdout)),
            None => rules.push(Rule {
                prefix: prefix.to_string(),
                results: VecDeque::new(),
                fallback: Some(result_for(code, stdout)),
                effect: None,
            }),
        }
    }

    /// Successive commands starting with `prefix` exit with the queued codes,
    /// then fall back to the rule's fixed result (or success).
    pub fn queue_exit_codes(&self, prefix: &str, codes: Vec<i32>) {
        let queued = codes.into_iter().map(|c| result_for(c, "")).collect();
        let mut rules = self.rules.borrow_mut();
        match rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => rule.results = queued,
            None => rules.push(Rule {
                prefix: prefix.to_string(),
                results: queued,
                fallback: None,
                effect: None,
            }),
        }
    }

    /// Run `effect` whenever a command starting with `prefix` succeeds.
    ///
    /// Used to simulate side effects such as a clone creating files.
    pub fn on_success(&self, prefix: &str, effect: impl Fn(&Invocation) + 'static) {
        let mut rules = self.rules.borrow_mut();
        match rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => rule.effect = Some(Box::new(effect)),
            None => rules.push(Rule {
                prefix: prefix.to_string(),
                results: VecDeque::new(),
                fallback: None,
                effect: Some(Box::new(effect)),
            }),
        }
    }

    /// Make `program` behave as if it were not installed.
    pub fn set_missing_tool(&self, program: &str) {
        self.missing_tools.borrow_mut().insert(program.to_string());
    }

    /// All invocations, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Command lines of all invocations, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.command_line()).collect()
    }

    /// Number of invocations whose command line starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.command_line().starts_with(prefix))
            .count()
    }

    /// Whether any invocation's command line starts with `prefix`.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.count(prefix) > 0
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.borrow_mut().push(invocation.clone());

        if self.missing_tools.borrow().contains(&invocation.program) {
            return Err(SetupError::ToolNotFound {
                tool: invocation.program.clone(),
                hint: "not found on PATH".to_string(),
            });
        }

        let line = invocation.command_line();
        let mut rules = self.rules.borrow_mut();

        // Longest matching prefix wins
        let rule = rules
            .iter_mut()
            .filter(|r| line.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len());

        let Some(rule) = rule else {
            return Ok(result_for(0, ""));
        };

        let result = rule
            .results
            .pop_front()
            .or_else(|| rule.fallback.clone())
            .unwrap_or_else(|| result_for(0, ""));

        if result.success {
            if let Some(effect) = &rule.effect {
                effect(invocation);
            }
        }

        Ok(result)
    }
}
