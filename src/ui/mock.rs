//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use lunex_setup::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("install_ktx", "no");
//!
//! ui.message("Checking KTX-Software");
//! assert!(!ui.confirm("install_ktx", "Install KTX-Software?", true));
//!
//! assert!(ui.has_message("KTX-Software"));
//! assert_eq!(ui.prompts_shown(), ["install_ktx".to_string()]);
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::prompts::parse_bool;
use super::{
    OutputMode, Prompt, PromptResult, PromptType, RunSummary, SpinnerHandle, StatusKind,
    TransferHandle, UserInterface,
};

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked more than once.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    steps: Vec<(usize, usize, String)>,
    banners: Vec<(StatusKind, Vec<String>)>,
    pauses: Vec<String>,
    transfers: Vec<String>,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
    default_prompt_response: Option<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            interactive: true,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order. After the queue is exhausted,
    /// falls back to `set_prompt_response` or defaults.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Set a response for any prompt key not explicitly configured.
    pub fn set_default_prompt_response(&mut self, response: &str) {
        self.default_prompt_response = Some(response.to_string());
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Numbered steps shown, as (current, total, title).
    pub fn steps(&self) -> &[(usize, usize, String)] {
        &self.steps
    }

    /// Messages of every pause, in order.
    pub fn pauses(&self) -> &[String] {
        &self.pauses
    }

    /// Labels of every download started.
    pub fn transfers(&self) -> &[String] {
        &self.transfers
    }

    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if any banner contains a line matching `text`.
    pub fn has_banner(&self, text: &str) -> bool {
        self.banners
            .iter()
            .any(|(_, lines)| lines.iter().any(|l| l.contains(text)))
    }

    fn scripted_response(&mut self, key: &str) -> Option<String> {
        if let Some(response) = self.prompt_queues.get_mut(key).and_then(|q| q.pop_front()) {
            return Some(response);
        }
        self.prompt_responses
            .get(key)
            .or(self.default_prompt_response.as_ref())
            .cloned()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let response = self
            .scripted_response(&prompt.key)
            .or_else(|| prompt.default.clone());

        Ok(match (&prompt.prompt_type, response) {
            (PromptType::Confirm, Some(r)) => PromptResult::Bool(parse_bool(&r)),
            (PromptType::Confirm, None) => PromptResult::Bool(false),
            (PromptType::Input, r) => PromptResult::String(r.unwrap_or_default()),
        })
    }

    fn pause(&mut self, message: &str) -> Result<()> {
        self.pauses.push(message.to_string());
        Ok(())
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(MockSpinner::default())
    }

    fn start_transfer(&mut self, label: &str) -> Box<dyn TransferHandle> {
        self.transfers.push(label.to_string());
        Box::new(MockTransfer::default())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        self.steps.push((current, total, title.to_string()));
    }

    fn show_banner(&mut self, kind: StatusKind, lines: &[String]) {
        self.banners.push((kind, lines.to_vec()));
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that records how it finished.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finished: Option<(StatusKind, String)>,
}

impl MockSpinner {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn finished(&self) -> Option<&(StatusKind, String)> {
        self.finished.as_ref()
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finished = Some((StatusKind::Success, msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.finished = Some((StatusKind::Failed, msg.to_string()));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finished = Some((StatusKind::Skipped, msg.to_string()));
    }
}

#[derive(Debug, Default)]
struct MockTransfer {
    received: u64,
}

impl TransferHandle for MockTransfer {
    fn update(&mut self, received: u64, _total: Option<u64>) {
        self.received = received;
    }

    fn finish(&mut self, _msg: &str) {}

    fn fail(&mut self, _msg: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(key: &str, default: Option<&str>) -> Prompt {
        Prompt {
            key: key.to_string(),
            question: "?".to_string(),
            prompt_type: PromptType::Input,
            default: default.map(String::from),
        }
    }

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("one");
        ui.success("two");
        ui.warning("three");
        ui.error("four");
        assert!(ui.has_message("one"));
        assert!(ui.has_success("two"));
        assert!(ui.has_warning("three"));
        assert!(ui.has_error("four"));
    }

    #[test]
    fn queued_responses_are_consumed_in_order() {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses("continue", vec!["no", "yes"]);
        assert!(!ui.confirm("continue", "?", true));
        assert!(ui.confirm("continue", "?", false));
        // Queue exhausted, falls back to the prompt default.
        assert!(!ui.confirm("continue", "?", false));
    }

    #[test]
    fn default_response_applies_to_unknown_keys() {
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");
        assert!(ui.confirm("anything", "?", false));
    }

    #[test]
    fn input_prompt_uses_response_then_default() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("ktx_install_dir", "D:/KTX");
        let answer = ui.prompt(&input("ktx_install_dir", Some("C:/x"))).unwrap();
        assert_eq!(answer.as_string(), "D:/KTX");

        let answer = ui.prompt(&input("other", Some("C:/x"))).unwrap();
        assert_eq!(answer.as_string(), "C:/x");
    }

    #[test]
    fn records_steps_banners_and_pauses() {
        let mut ui = MockUI::new();
        ui.show_step(2, 5, "Source dependencies");
        ui.show_banner(StatusKind::Warning, &["Version mismatch".to_string()]);
        ui.pause("Press Enter to continue").unwrap();

        assert_eq!(ui.steps(), [(2, 5, "Source dependencies".to_string())]);
        assert!(ui.has_banner("mismatch"));
        assert_eq!(ui.pauses().len(), 1);
    }

    #[test]
    fn spinner_records_finish() {
        let mut spinner = MockSpinner::default();
        spinner.set_message("working");
        spinner.finish_skipped("nothing to do");
        assert_eq!(spinner.messages(), ["working".to_string()]);
        assert_eq!(
            spinner.finished(),
            Some(&(StatusKind::Skipped, "nothing to do".to_string()))
        );
    }
}
