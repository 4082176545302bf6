use crate::agent::wire::Content;

/// Conversation history of the single chat session.
///
/// Only completed exchanges are kept, as a user turn followed by the
/// model's final answer. Intermediate tool traffic is dropped.
#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<Content>,
    max_exchanges: usize,
}

impl Session {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_exchanges,
        }
    }

    pub fn history(&self) -> &[Content] {
        &self.turns
    }

    pub fn record(&mut self, user: &str, answer: &str) {
        self.turns.push(Content::user_text(user));
        self.turns.push(Content::model_text(answer));

        let keep = self.max_exchanges * 2;
        if self.turns.len() > keep {
            let excess = self.turns.len() - keep;
            self.turns.drain(..excess);
        }
    }

    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }
}
