//! Word-by-word reveal of an already complete response.
//!
//! The generate endpoint is non-streaming, so the full text is in memory
//! before anything is shown. This simulates progressive arrival for
//! readability: one word per tick, fixed cadence.

use std::time::Duration;

/// Cadence of the reveal: one word appears per tick.
pub const REVEAL_TICK: Duration = Duration::from_millis(50);

/// Presentation state for one message slot. Pure state machine, no timer
/// of its own; the app loop's interval calls [`RevealState::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    source: String,
    words_shown: usize,
    total_words: usize,
    revealing: bool,
    /// Whether this slot went through the word-by-word path. Non-animated
    /// slots show the source verbatim, spacing included.
    animated: bool,
}

impl RevealState {
    /// Start a reveal from empty. An empty (or all-space) source has
    /// nothing to show and never starts revealing.
    pub fn animated(source: impl Into<String>) -> Self {
        let source = source.into();
        let total_words = count_words(&source);
        Self {
            source,
            words_shown: 0,
            total_words,
            revealing: total_words > 0,
            animated: true,
        }
    }

    /// Show the whole text at once, exactly as authored. Used for user
    /// messages and local notices, which never animate.
    pub fn immediate(source: impl Into<String>) -> Self {
        let source = source.into();
        let total_words = count_words(&source);
        Self {
            source,
            words_shown: total_words,
            total_words,
            revealing: false,
            animated: false,
        }
    }

    /// Reassign the slot to new text, cancelling any reveal in progress
    /// and restarting from empty.
    pub fn reset(&mut self, source: impl Into<String>) {
        *self = Self::animated(source);
    }

    /// Advance by one word. Returns true while more words remain.
    pub fn tick(&mut self) -> bool {
        if !self.revealing {
            return false;
        }
        self.words_shown += 1;
        if self.words_shown >= self.total_words {
            self.words_shown = self.total_words;
            self.revealing = false;
        }
        self.revealing
    }

    /// The text currently visible. Non-animated slots return the source
    /// verbatim. Animated slots return the first `words_shown` words
    /// joined by single spaces; splitting discards empty tokens, so
    /// repeated, leading or trailing spaces never show up as gaps.
    pub fn visible_text(&self) -> String {
        if !self.animated {
            return self.source.clone();
        }
        self.source
            .split(' ')
            .filter(|word| !word.is_empty())
            .take(self.words_shown)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }
}

fn count_words(text: &str) -> usize {
    text.split(' ').filter(|word| !word.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the reveal to completion, collecting each intermediate state.
    fn run(state: &mut RevealState) -> Vec<String> {
        let mut seen = Vec::new();
        while state.is_revealing() {
            state.tick();
            seen.push(state.visible_text());
        }
        seen
    }

    #[test]
    fn reveals_word_by_word_in_order() {
        let mut state = RevealState::animated("a b c");
        assert!(state.is_revealing());
        assert_eq!(state.visible_text(), "");

        let seen = run(&mut state);
        assert_eq!(seen, vec!["a", "a b", "a b c"]);
        assert_eq!(state.visible_text(), "a b c");
        assert!(!state.is_revealing());
    }

    #[test]
    fn repeated_and_surrounding_spaces_are_discarded() {
        let mut state = RevealState::animated("  hola   que  tal ");
        let seen = run(&mut state);
        assert_eq!(seen, vec!["hola", "hola que", "hola que tal"]);
    }

    #[test]
    fn empty_source_never_starts() {
        let state = RevealState::animated("");
        assert!(!state.is_revealing());
        assert_eq!(state.visible_text(), "");

        let spaces = RevealState::animated("   ");
        assert!(!spaces.is_revealing());
        assert_eq!(spaces.visible_text(), "");
    }

    #[test]
    fn tick_after_completion_is_a_no_op() {
        let mut state = RevealState::animated("solo");
        state.tick();
        assert!(!state.is_revealing());
        assert!(!state.tick());
        assert_eq!(state.visible_text(), "solo");
    }

    #[test]
    fn reset_mid_reveal_restarts_from_empty() {
        let mut state = RevealState::animated("uno dos tres");
        state.tick();
        assert_eq!(state.visible_text(), "uno");

        state.reset("uno dos tres");
        assert_eq!(state.visible_text(), "");
        assert!(state.is_revealing());

        let seen = run(&mut state);
        assert_eq!(seen.last().map(String::as_str), Some("uno dos tres"));
    }

    #[test]
    fn immediate_shows_everything_and_never_animates() {
        let state = RevealState::immediate("ya estoy aqui");
        assert!(!state.is_revealing());
        assert_eq!(state.visible_text(), "ya estoy aqui");
    }

    #[test]
    fn immediate_preserves_spacing_exactly() {
        let state = RevealState::immediate("hola  mundo");
        assert_eq!(state.visible_text(), "hola  mundo");

        let padded = RevealState::immediate(" con  bordes ");
        assert_eq!(padded.visible_text(), " con  bordes ");
    }
}
