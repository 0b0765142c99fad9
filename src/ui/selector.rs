//! Popup model selector, the TUI stand-in for a dropdown.

use crate::models::{self, AVAILABLE_MODELS};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

/// What a key press did to the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorResult {
    /// A model was picked
    Chosen(&'static str),
    /// Closed without choosing
    Cancelled,
    None,
}

/// Arrow-key selection over the fixed model catalog
#[derive(Debug, Clone)]
pub struct ModelSelector {
    selected: usize,
}

impl ModelSelector {
    /// Open with the current model highlighted.
    pub fn new(current_id: &str) -> Self {
        Self {
            selected: models::position(current_id).unwrap_or(0),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SelectorResult {
        if key.kind != KeyEventKind::Press {
            return SelectorResult::None;
        }

        match key.code {
            KeyCode::Up => {
                self.selected = if self.selected == 0 {
                    AVAILABLE_MODELS.len() - 1
                } else {
                    self.selected - 1
                };
                SelectorResult::None
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % AVAILABLE_MODELS.len();
                SelectorResult::None
            }
            KeyCode::Enter => SelectorResult::Chosen(AVAILABLE_MODELS[self.selected].id),
            KeyCode::Esc => SelectorResult::Cancelled,
            _ => SelectorResult::None,
        }
    }

    /// Centered popup area within the given frame area.
    pub fn popup_area(frame: Rect) -> Rect {
        let width = 44.min(frame.width);
        let height = (AVAILABLE_MODELS.len() as u16 + 2).min(frame.height);
        Rect {
            x: frame.x + frame.width.saturating_sub(width) / 2,
            y: frame.y + frame.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }
}

impl Widget for &ModelSelector {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("🧠 Pick a model (Enter to select, Esc to cancel)")
            .style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        for (index, entry) in AVAILABLE_MODELS.iter().enumerate() {
            if index >= inner.height as usize {
                break;
            }

            let style = if index == self.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::styled(format!(" {} ", entry.name), style),
                Span::styled(format!("({})", entry.id), Style::default().fg(Color::DarkGray)),
            ]);
            buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opens_on_the_current_model() {
        let mut selector = ModelSelector::new("qwen3:8b");
        assert_eq!(selector.handle_key(press(KeyCode::Enter)), SelectorResult::Chosen("qwen3:8b"));
    }

    #[test]
    fn arrows_wrap_around_the_catalog() {
        let mut selector = ModelSelector::new(AVAILABLE_MODELS[0].id);
        selector.handle_key(press(KeyCode::Up));
        let last = AVAILABLE_MODELS[AVAILABLE_MODELS.len() - 1].id;
        assert_eq!(selector.handle_key(press(KeyCode::Enter)), SelectorResult::Chosen(last));

        selector.handle_key(press(KeyCode::Down));
        assert_eq!(
            selector.handle_key(press(KeyCode::Enter)),
            SelectorResult::Chosen(AVAILABLE_MODELS[0].id)
        );
    }

    #[test]
    fn esc_cancels() {
        let mut selector = ModelSelector::new("llama3.2");
        assert_eq!(selector.handle_key(press(KeyCode::Esc)), SelectorResult::Cancelled);
    }
}
