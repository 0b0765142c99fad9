//! Conversation UI components for the chat view

pub mod commands;
pub mod composer;
pub mod history;
pub mod manager;
pub mod reveal;

pub use commands::{ParsedCommand, SlashCommand, get_help_text};
pub use composer::MessageComposer;
pub use history::ConversationHistory;
pub use manager::{ConversationAction, ConversationManager};
pub use reveal::{REVEAL_TICK, RevealState};
