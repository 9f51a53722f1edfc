use crate::moods::{Mood, MoodTable};
use std::collections::VecDeque;

/// Name the completion service is cued to answer as.
pub const BOT_NAME: &str = "Chappie";

/// Entries kept before the next append evicts the oldest one.
const SOFT_CAP: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub author: String,
    pub content: String,
}

/// Rolling window of one channel's conversation and the bot's mood there.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<ChatEntry>,
    mood: Mood,
    preamble: String,
}

impl ConversationHistory {
    pub fn new(moods: &MoodTable) -> Self {
        Self {
            entries: VecDeque::new(),
            mood: Mood::Default,
            preamble: moods.default_preamble().to_string(),
        }
    }

    /// Appends an entry. The oldest entry is dropped first once more than
    /// `SOFT_CAP` are held, so the window settles at `SOFT_CAP + 1`.
    pub fn add_entry(&mut self, author: impl Into<String>, content: impl Into<String>) {
        if self.entries.len() > SOFT_CAP {
            self.entries.pop_front();
        }
        self.entries.push_back(ChatEntry {
            author: author.into(),
            content: content.into(),
        });
    }

    pub fn render_prompt(&self) -> String {
        let mut prompt = self.preamble.clone();
        for entry in &self.entries {
            prompt.push_str(&format!("\n\nUser({}): {}", entry.author, entry.content));
        }
        if !self.entries.is_empty() {
            prompt.push_str(&format!("\nUser({}):", BOT_NAME));
        }
        prompt
    }

    pub fn change_mood(&mut self, key: &str, moods: &MoodTable) {
        let (mood, preamble) = moods.resolve(key);
        self.mood = mood;
        self.preamble = preamble.to_string();
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    #[cfg(test)]
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
