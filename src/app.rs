//! Application event loop: terminal lifecycle, key routing, reveal ticks
//! and completion draining.

use crate::config::Config;
use crate::llm::{CompletionOutcome, OllamaClient};
use crate::ui::conversation::{ConversationAction, ConversationManager, REVEAL_TICK};
use crate::ui::selector::{ModelSelector, SelectorResult};
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Stdout;
use tokio::sync::mpsc;

pub struct App {
    config: Config,
    manager: ConversationManager,
    client: OllamaClient,
    completion_tx: mpsc::UnboundedSender<CompletionOutcome>,
    completion_rx: mpsc::UnboundedReceiver<CompletionOutcome>,
    selector: Option<ModelSelector>,
    should_exit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let mut manager =
            ConversationManager::new(config.starting_model(), config.ui.show_timestamps);
        manager.set_focus(true);

        Self {
            manager,
            client: OllamaClient::new(config.endpoint.clone()),
            config,
            completion_tx,
            completion_rx,
            selector: None,
            should_exit: false,
        }
    }

    /// Run the chat view until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(REVEAL_TICK);

        while !self.should_exit {
            self.drain_completions();

            terminal.draw(|frame| {
                frame.render_widget(&self.manager, frame.size());
                if let Some(selector) = &self.selector {
                    let area = ModelSelector::popup_area(frame.size());
                    frame.render_widget(selector, area);
                }
            })?;

            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => self.handle_key(key),
                        Some(Ok(_)) => {} // resize and mouse events just trigger a redraw
                        Some(Err(_)) | None => break,
                    }
                }
                _ = ticker.tick() => {
                    self.manager.tick();
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always exits, even mid-request
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_exit = true;
            return;
        }

        if let Some(selector) = &mut self.selector {
            match selector.handle_key(key) {
                SelectorResult::Chosen(id) => {
                    if self.manager.set_model(id) {
                        self.persist_selected_model();
                    }
                    self.selector = None;
                }
                SelectorResult::Cancelled => {
                    self.selector = None;
                }
                SelectorResult::None => {}
            }
            return;
        }

        match self.manager.handle_key(key) {
            ConversationAction::Dispatch(request) => {
                self.client.dispatch(request, self.completion_tx.clone());
            }
            ConversationAction::ShowModelSelector => {
                self.selector = Some(ModelSelector::new(self.manager.selected_model()));
            }
            ConversationAction::ModelChanged => {
                self.persist_selected_model();
            }
            ConversationAction::Exit => {
                self.should_exit = true;
            }
            ConversationAction::None => {}
        }
    }

    /// Remember the chosen model as the default for the next session.
    /// A failed write is ignored; the selection still applies in-session.
    fn persist_selected_model(&mut self) {
        self.config.default_model = self.manager.selected_model().to_string();
        let _ = self.config.save();
    }

    /// Apply any settled requests. At most one can be in flight, but the
    /// channel is drained fully in case a completion raced the exit path.
    fn drain_completions(&mut self) {
        while let Ok(outcome) = self.completion_rx.try_recv() {
            self.manager.apply_completion(outcome);
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
