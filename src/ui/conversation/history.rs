//! Conversation history display component

use crate::events::{ChatMessage, ChatRole};
use crate::ui::conversation::reveal::RevealState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::collections::VecDeque;

/// A message paired with its presentation state. The reveal belongs to the
/// slot: reusing the slot for new text replaces the reveal wholesale.
#[derive(Debug, Clone)]
struct MessageSlot {
    message: ChatMessage,
    reveal: RevealState,
}

/// Conversation history display component
#[derive(Clone)]
pub struct ConversationHistory {
    slots: VecDeque<MessageSlot>,
    max_messages: usize,
    show_timestamps: bool,
    /// True while a request is in flight; drives the thinking indicator
    waiting: bool,
}

impl ConversationHistory {
    pub fn new(max_messages: usize, show_timestamps: bool) -> Self {
        Self {
            slots: VecDeque::new(),
            max_messages,
            show_timestamps,
            waiting: false,
        }
    }

    /// Append a user message. User-authored text never animates.
    pub fn push_user(&mut self, content: impl Into<String>) {
        let message = ChatMessage::user(content);
        let reveal = RevealState::immediate(&message.content);
        self.push_slot(MessageSlot { message, reveal });
    }

    /// Append an assistant message and start its word-by-word reveal.
    pub fn push_assistant(&mut self, content: impl Into<String>, model: impl Into<String>) {
        let message = ChatMessage::assistant(content, model);
        let reveal = RevealState::animated(&message.content);
        self.push_slot(MessageSlot { message, reveal });
    }

    /// Append a local status line (shown immediately, never animated).
    pub fn push_notice(&mut self, content: impl Into<String>) {
        let message = ChatMessage::notice(content);
        let reveal = RevealState::immediate(&message.content);
        self.push_slot(MessageSlot { message, reveal });
    }

    fn push_slot(&mut self, slot: MessageSlot) {
        self.slots.push_back(slot);
        if self.slots.len() > self.max_messages {
            self.slots.pop_front();
        }
    }

    /// Advance every in-progress reveal by one word. Called from the app
    /// loop on the fixed reveal interval.
    pub fn tick_reveals(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.reveal.is_revealing() {
                slot.reveal.tick();
            }
        }
    }

    pub fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }

    /// Clear all messages
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[allow(dead_code)]
    pub fn message_count(&self) -> usize {
        self.slots.len()
    }

    #[allow(dead_code)]
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.slots.iter().map(|slot| &slot.message)
    }

    #[allow(dead_code)]
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.slots.back().map(|slot| &slot.message)
    }

    /// Visible text of the newest message, as currently revealed.
    #[allow(dead_code)]
    pub fn last_visible_text(&self) -> Option<String> {
        self.slots.back().map(|slot| slot.reveal.visible_text())
    }

    /// Whether any slot is still animating.
    #[allow(dead_code)]
    pub fn is_revealing(&self) -> bool {
        self.slots.iter().any(|slot| slot.reveal.is_revealing())
    }
}

impl Widget for &ConversationHistory {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 EduLlama");

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.slots.is_empty() && !self.waiting {
            let welcome_lines = vec![
                Line::from(vec![Span::styled(
                    "What would you like to ask today?",
                    Style::default().fg(Color::Gray),
                )]),
                Line::from(vec![Span::raw("")]),
                Line::from(vec![Span::styled(
                    "Type a question below, or / for commands.",
                    Style::default().fg(Color::DarkGray),
                )]),
            ];

            for (i, line) in welcome_lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
            return;
        }

        let mut all_lines: Vec<Line> = Vec::new();
        for slot in self.slots.iter() {
            let mut lines = self.render_slot(slot, inner_area.width);
            all_lines.append(&mut lines);
            // spacing between messages
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        if self.waiting {
            all_lines.push(thinking_line());
        }

        // Show the newest lines, anchored to the bottom of the area
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        let visible = &all_lines[start..];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

impl ConversationHistory {
    /// Render a single message slot into lines
    fn render_slot(&self, slot: &MessageSlot, width: u16) -> Vec<Line> {
        let mut lines = Vec::new();

        let role_icon = match slot.message.role {
            ChatRole::User => "👤",
            ChatRole::Assistant => "🤖",
            ChatRole::Notice => "⚙️",
        };

        let mut header = role_icon.to_string();
        if self.show_timestamps {
            header.push(' ');
            header.push_str(&slot.message.timestamp.format("%H:%M:%S").to_string());
        }
        if let Some(model) = slot.message.model.as_deref() {
            header.push_str(&format!(" [{}]", model));
        }
        header.push(' ');
        header.push_str(&"─".repeat(20));

        lines.push(Line::from(vec![Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )]));

        let style = self.content_style(slot.message.role);
        let content_lines = wrap_text(&slot.reveal.visible_text(), width.saturating_sub(2) as usize);
        let last_index = content_lines.len().saturating_sub(1);
        for (i, content_line) in content_lines.into_iter().enumerate() {
            let mut spans = vec![Span::raw("  "), Span::styled(content_line, style)];
            if slot.reveal.is_revealing() && i == last_index {
                spans.push(Span::styled("▋", Style::default().fg(Color::Yellow)));
            }
            lines.push(Line::from(spans));
        }

        lines
    }

    fn content_style(&self, role: ChatRole) -> Style {
        match role {
            ChatRole::User => Style::default().fg(Color::Blue),
            ChatRole::Assistant => Style::default().fg(Color::Green),
            ChatRole::Notice => Style::default().fg(Color::Yellow),
        }
    }
}

/// Thinking indicator shown while a request is in flight
fn thinking_line() -> Line<'static> {
    let dots = match (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / 300)
        % 4
    {
        0 => ".",
        1 => "..",
        2 => "...",
        _ => "   ",
    };

    Line::from(vec![
        Span::styled("🤖 ", Style::default().fg(Color::Green)),
        Span::styled("Thinking", Style::default().fg(Color::Green)),
        Span::styled(dots, Style::default().fg(Color::Yellow)),
    ])
}

/// Wrap text to fit within the given width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_fully_visible_immediately() {
        let mut history = ConversationHistory::new(100, true);
        history.push_user("hola modelo");
        assert_eq!(history.last_visible_text().as_deref(), Some("hola modelo"));
        assert!(!history.is_revealing());
    }

    #[test]
    fn user_text_keeps_its_internal_spacing() {
        let mut history = ConversationHistory::new(100, true);
        history.push_user("dos  espacios   aqui");
        assert_eq!(
            history.last_visible_text().as_deref(),
            Some("dos  espacios   aqui")
        );
    }

    #[test]
    fn assistant_messages_reveal_over_ticks() {
        let mut history = ConversationHistory::new(100, true);
        history.push_assistant("uno dos", "llama3.2");
        assert_eq!(history.last_visible_text().as_deref(), Some(""));
        assert!(history.is_revealing());

        history.tick_reveals();
        assert_eq!(history.last_visible_text().as_deref(), Some("uno"));
        history.tick_reveals();
        assert_eq!(history.last_visible_text().as_deref(), Some("uno dos"));
        assert!(!history.is_revealing());
    }

    #[test]
    fn oldest_message_is_dropped_past_the_cap() {
        let mut history = ConversationHistory::new(2, false);
        history.push_user("primero");
        history.push_user("segundo");
        history.push_user("tercero");
        assert_eq!(history.message_count(), 2);
        let first = history.messages().next().unwrap();
        assert_eq!(first.content, "segundo");
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }
}
