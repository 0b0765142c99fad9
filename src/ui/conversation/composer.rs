use crate::ui::conversation::commands::{CommandEntry, ParsedCommand, command_entries, parse_slash_command};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    Submitted(String),
    Command(ParsedCommand),
    None,
}

/// Command palette shown while the input starts with '/'
#[derive(Clone)]
struct PaletteState {
    filtered: Vec<CommandEntry>,
    selected: usize,
}

/// Input box for composing prompts and slash commands
#[derive(Clone)]
pub struct MessageComposer {
    content: String,
    /// Byte offset into `content`, always on a char boundary
    cursor: usize,
    placeholder: String,
    has_focus: bool,
    /// True while a request is in flight; only changes the styling,
    /// submission gating lives in the conversation manager
    waiting: bool,
    entries: Vec<CommandEntry>,
    palette: Option<PaletteState>,
}

impl MessageComposer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            has_focus: true,
            waiting: false,
            entries: command_entries(),
            palette: None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.insert_char('\n');
                } else if self.palette.is_some() {
                    self.apply_selected_command();
                } else if !self.content.trim().is_empty() {
                    let content = std::mem::take(&mut self.content);
                    self.cursor = 0;
                    return match parse_slash_command(&content) {
                        Some(command) => ComposerResult::Command(command),
                        None => ComposerResult::Submitted(content),
                    };
                }
            }
            KeyCode::Up => {
                if self.palette.is_some() {
                    self.move_selection(-1);
                }
            }
            KeyCode::Down => {
                if self.palette.is_some() {
                    self.move_selection(1);
                }
            }
            KeyCode::Esc => {
                self.palette = None;
            }
            KeyCode::Tab => {
                if self.palette.is_some() {
                    self.apply_selected_command();
                }
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                self.refresh_palette();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.content.remove(prev);
                    self.cursor = prev;
                    self.refresh_palette();
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.content.len() {
                    self.content.remove(self.cursor);
                    self.refresh_palette();
                }
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor = self.prev_boundary();
                }
            }
            KeyCode::Right => {
                if self.cursor < self.content.len() {
                    self.cursor = self.next_boundary();
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.content.len();
            }
            _ => {}
        }

        ComposerResult::None
    }

    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.content.len())
    }

    /// Open, update or close the palette to match the current input.
    fn refresh_palette(&mut self) {
        let is_command_prefix =
            self.content.starts_with('/') && !self.content.contains(char::is_whitespace);

        if !is_command_prefix {
            self.palette = None;
            return;
        }

        let query = self.content.trim_start_matches('/').to_lowercase();
        let filtered: Vec<CommandEntry> = self
            .entries
            .iter()
            .copied()
            .filter(|entry| query.is_empty() || entry.keyword.starts_with(query.as_str()))
            .collect();

        if filtered.is_empty() {
            self.palette = None;
            return;
        }

        let selected = match &self.palette {
            Some(palette) => palette.selected.min(filtered.len() - 1),
            None => 0,
        };
        self.palette = Some(PaletteState { filtered, selected });
    }

    fn move_selection(&mut self, delta: isize) {
        if let Some(palette) = &mut self.palette {
            let len = palette.filtered.len() as isize;
            let mut next = palette.selected as isize + delta;
            if next < 0 {
                next = len - 1;
            } else if next >= len {
                next = 0;
            }
            palette.selected = next as usize;
        }
    }

    fn apply_selected_command(&mut self) {
        if let Some(palette) = self.palette.take() {
            if let Some(entry) = palette.filtered.get(palette.selected) {
                self.content = format!("/{} ", entry.keyword);
                self.cursor = self.content.len();
            }
        }
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }

    #[allow(dead_code)]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Widget for &MessageComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, border_style) = if self.waiting {
            ("⏳ Waiting for the model...", Style::default().fg(Color::DarkGray))
        } else if self.has_focus {
            ("✏️  Ask the local model", Style::default().fg(Color::Green))
        } else {
            ("✏️  Ask the local model", Style::default().fg(Color::Gray))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(border_style);

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            let mut content = self.content.clone();
            if self.has_focus && !self.waiting {
                content.insert(self.cursor.min(content.len()), '▌');
            }

            for (i, line_text) in content.split('\n').enumerate() {
                if i < inner_area.height as usize {
                    let line = Line::from(vec![Span::raw(line_text.to_string())]);
                    buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
                }
            }
        }

        if let Some(palette) = &self.palette {
            self.render_palette(palette, area, buf);
        }
    }
}

impl MessageComposer {
    fn render_palette(&self, palette: &PaletteState, area: Rect, buf: &mut Buffer) {
        let palette_height = (palette.filtered.len().min(5) + 2) as u16;
        let palette_area = Rect {
            x: area.x,
            y: area.y.saturating_sub(palette_height),
            width: area.width,
            height: palette_height,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Commands")
            .style(Style::default().fg(Color::Blue));
        let inner = block.inner(palette_area);
        block.render(palette_area, buf);

        for (index, entry) in palette.filtered.iter().enumerate() {
            if index >= inner.height as usize {
                break;
            }

            let style = if index == palette.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::styled(format!("/{}", entry.keyword), style),
                Span::styled(" — ", Style::default().fg(Color::DarkGray)),
                Span::styled(entry.description, Style::default().fg(Color::Gray)),
            ]);

            buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
        }
    }
}
