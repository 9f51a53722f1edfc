use crate::history::ConversationHistory;
use crate::moods::MoodTable;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct ChatSession {
    pub channel_id: String,
    pub history: ConversationHistory,
}

impl ChatSession {
    pub fn new(channel_id: impl Into<String>, moods: &MoodTable) -> Self {
        Self {
            channel_id: channel_id.into(),
            history: ConversationHistory::new(moods),
        }
    }
}

/// Sessions by channel id. Sessions are created on first contact and never removed.
///
/// Each session sits behind its own lock so work on one channel is serialized
/// while other channels proceed independently.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<ChatSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_create(
        &self,
        channel_id: &str,
        moods: &MoodTable,
    ) -> Arc<Mutex<ChatSession>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(channel_id.to_string())
            .or_insert_with(|| {
                debug!("Opening chat session for channel {}", channel_id);
                Arc::new(Mutex::new(ChatSession::new(channel_id, moods)))
            })
            .clone()
    }

    #[cfg(test)]
    pub async fn get(&self, channel_id: &str) -> Option<Arc<Mutex<ChatSession>>> {
        self.sessions.lock().await.get(channel_id).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moods::testing::table;
    use crate::moods::Mood;

    #[tokio::test]
    async fn test_creates_fresh_session_once() {
        let moods = table();
        let registry = SessionRegistry::new();
        assert!(registry.get("general").await.is_none());

        let first = registry.get_or_create("general", &moods).await;
        {
            let session = first.lock().await;
            assert_eq!(session.channel_id, "general");
            assert_eq!(session.history.mood(), Mood::Default);
            assert!(session.history.is_empty());
        }
        first.lock().await.history.add_entry("alice", "hi");

        let again = registry.get_or_create("general", &moods).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.lock().await.history.len(), 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_channels_are_isolated() {
        let moods = table();
        let registry = SessionRegistry::new();
        let a = registry.get_or_create("a", &moods).await;
        let b = registry.get_or_create("b", &moods).await;
        a.lock().await.history.change_mood("angry", &moods);
        assert_eq!(b.lock().await.history.mood(), Mood::Default);
        assert_eq!(registry.len().await, 2);
    }
}
