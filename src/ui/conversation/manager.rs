use crate::llm::{CompletionOutcome, InferenceRequest};
use crate::models;
use crate::ui::conversation::commands::{ParsedCommand, SlashCommand, get_help_text};
use crate::ui::conversation::composer::{ComposerResult, MessageComposer};
use crate::ui::conversation::history::ConversationHistory;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

/// Shown in place of a reply when the inference call fails for any reason.
pub const FALLBACK_ERROR_TEXT: &str =
    "❌ Could not reach the local model. Make sure Ollama is running (ollama serve).";

/// Actions the conversation asks the app loop to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
    ShowModelSelector,
    /// The selected model changed; the app persists it as the new default
    ModelChanged,
    /// Dispatch exactly one inference request
    Dispatch(InferenceRequest),
}

/// Owns the conversation state: the message list, the busy gate and the
/// selected model. All IO happens outside; `submit` hands back the request
/// to run and `apply_completion` settles it.
pub struct ConversationManager {
    history: ConversationHistory,
    composer: MessageComposer,
    selected_model: String,
    /// Model recorded at submit time; the reply (or failure line) is
    /// attributed to this even if the selection changes mid-flight.
    pending_model: String,
    is_busy: bool,
}

impl ConversationManager {
    pub fn new(selected_model: impl Into<String>, show_timestamps: bool) -> Self {
        let selected_model = selected_model.into();
        Self {
            history: ConversationHistory::new(100, show_timestamps),
            composer: MessageComposer::new("Ask anything, it stays on this machine..."),
            pending_model: selected_model.clone(),
            selected_model,
            is_busy: false,
        }
    }

    /// Submit a prompt. Dropped silently (no queueing, no error) when the
    /// text trims to empty or a request is already in flight; otherwise
    /// appends the user message, raises the busy gate and returns the one
    /// request to dispatch.
    pub fn submit(&mut self, text: &str) -> Option<InferenceRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.is_busy {
            return None;
        }

        self.history.push_user(trimmed);
        self.is_busy = true;
        self.pending_model = self.selected_model.clone();
        self.sync_waiting();

        Some(InferenceRequest {
            model: self.pending_model.clone(),
            prompt: trimmed.to_string(),
        })
    }

    /// Settle the in-flight request. Appends exactly one assistant message:
    /// the response on success, the fixed fallback line on failure.
    pub fn apply_completion(&mut self, outcome: CompletionOutcome) {
        let model = self.pending_model.clone();
        match outcome {
            CompletionOutcome::Completed { text } => {
                self.history.push_assistant(text, model);
            }
            CompletionOutcome::Failed => {
                self.history.push_assistant(FALLBACK_ERROR_TEXT, model);
            }
        }
        self.is_busy = false;
        self.sync_waiting();
    }

    /// Change the model used for the *next* submission. Ids outside the
    /// catalog are rejected; an in-flight request is never affected.
    pub fn set_model(&mut self, id: &str) -> bool {
        match models::find(id) {
            Some(entry) => {
                self.selected_model = entry.id.to_string();
                self.history
                    .push_notice(format!("Model set to {} ({})", entry.name, entry.id));
                true
            }
            None => {
                self.history
                    .push_notice(format!("Unknown model '{}'. Try /model to pick one.", id));
                false
            }
        }
    }

    /// Advance reveal animations by one word.
    pub fn tick(&mut self) {
        self.history.tick_reveals();
    }

    /// Handle key input, translating composer results into actions.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> ConversationAction {
        match self.composer.handle_key(key) {
            ComposerResult::Submitted(input) => match self.submit(&input) {
                Some(request) => ConversationAction::Dispatch(request),
                None => ConversationAction::None,
            },
            ComposerResult::Command(command) => self.handle_slash_command(command),
            ComposerResult::None => ConversationAction::None,
        }
    }

    fn handle_slash_command(&mut self, command: ParsedCommand) -> ConversationAction {
        match command.command {
            SlashCommand::Model => match command.argument() {
                Some(id) => {
                    if self.set_model(id.trim()) {
                        ConversationAction::ModelChanged
                    } else {
                        ConversationAction::None
                    }
                }
                None => ConversationAction::ShowModelSelector,
            },
            SlashCommand::Clear => {
                self.history.clear();
                ConversationAction::None
            }
            SlashCommand::Help => {
                self.history.push_notice(get_help_text());
                ConversationAction::None
            }
            SlashCommand::Quit => ConversationAction::Exit,
        }
    }

    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    #[allow(dead_code)]
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.composer.set_focus(has_focus);
    }

    fn sync_waiting(&mut self) {
        self.history.set_waiting(self.is_busy);
        self.composer.set_waiting(self.is_busy);
    }
}

impl Widget for &ConversationManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // History
                Constraint::Length(3), // Composer
            ])
            .split(area);

        self.history.render(chunks[0], buf);
        (&self.composer).render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChatRole;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn manager() -> ConversationManager {
        ConversationManager::new("llama3.2", false)
    }

    fn type_and_enter(m: &mut ConversationManager, text: &str) -> ConversationAction {
        for c in text.chars() {
            m.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        m.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    #[test]
    fn submit_appends_user_message_and_raises_busy_gate() {
        let mut m = manager();
        let request = m.submit("¿Qué es Rust?").expect("request");
        assert_eq!(request.model, "llama3.2");
        assert_eq!(request.prompt, "¿Qué es Rust?");
        assert!(m.is_busy());
        assert_eq!(m.history().message_count(), 1);
        assert_eq!(m.history().last_message().unwrap().role, ChatRole::User);
    }

    #[test]
    fn blank_submissions_are_no_ops() {
        let mut m = manager();
        assert!(m.submit("").is_none());
        assert!(m.submit("   ").is_none());
        assert!(!m.is_busy());
        assert_eq!(m.history().message_count(), 0);
    }

    #[test]
    fn submit_while_busy_is_dropped_silently() {
        let mut m = manager();
        m.submit("primera").unwrap();
        assert!(m.submit("segunda").is_none());
        // only the first user message was appended, nothing queued
        assert_eq!(m.history().message_count(), 1);
        assert!(m.is_busy());
    }

    #[test]
    fn success_appends_one_assistant_message_and_clears_busy() {
        let mut m = manager();
        m.submit("di hola").unwrap();
        m.apply_completion(CompletionOutcome::Completed { text: "Hola".to_string() });

        assert!(!m.is_busy());
        assert_eq!(m.history().message_count(), 2);
        let last = m.history().last_message().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.content, "Hola");
        assert_eq!(last.model.as_deref(), Some("llama3.2"));
    }

    #[test]
    fn failure_appends_fixed_fallback_text_and_clears_busy() {
        let mut m = manager();
        m.submit("di hola").unwrap();
        m.apply_completion(CompletionOutcome::Failed);

        assert!(!m.is_busy());
        let last = m.history().last_message().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.content, FALLBACK_ERROR_TEXT);
        // ready for the next exchange
        assert!(m.submit("otra vez").is_some());
    }

    #[test]
    fn set_model_affects_next_submission_not_the_in_flight_one() {
        let mut m = manager();
        m.submit("primera").unwrap();
        assert!(m.set_model("qwen3:8b"));

        m.apply_completion(CompletionOutcome::Completed { text: "ok".to_string() });
        // reply is attributed to the model recorded at submit time
        let reply = m
            .history()
            .messages()
            .find(|msg| msg.role == ChatRole::Assistant)
            .unwrap();
        assert_eq!(reply.model.as_deref(), Some("llama3.2"));

        let next = m.submit("segunda").unwrap();
        assert_eq!(next.model, "qwen3:8b");
    }

    #[test]
    fn set_model_rejects_ids_outside_the_catalog() {
        let mut m = manager();
        assert!(!m.set_model("gpt-4o"));
        assert_eq!(m.selected_model(), "llama3.2");
    }

    #[test]
    fn model_command_with_id_reports_the_change() {
        let mut m = manager();
        let action = type_and_enter(&mut m, "/model qwen3:8b");
        assert_eq!(action, ConversationAction::ModelChanged);
        assert_eq!(m.selected_model(), "qwen3:8b");
    }

    #[test]
    fn model_command_with_unknown_id_changes_nothing() {
        let mut m = manager();
        let action = type_and_enter(&mut m, "/model gpt-4o");
        assert_eq!(action, ConversationAction::None);
        assert_eq!(m.selected_model(), "llama3.2");
    }

    #[test]
    fn assistant_reply_reveals_word_by_word() {
        let mut m = manager();
        m.submit("saluda").unwrap();
        m.apply_completion(CompletionOutcome::Completed { text: "hola que tal".to_string() });

        assert_eq!(m.history().last_visible_text().as_deref(), Some(""));
        m.tick();
        assert_eq!(m.history().last_visible_text().as_deref(), Some("hola"));
        m.tick();
        m.tick();
        assert_eq!(m.history().last_visible_text().as_deref(), Some("hola que tal"));
        assert!(!m.history().is_revealing());
    }
}
