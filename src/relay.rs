use crate::commands::{Command, ACCESS_DENIED, MODEL_NOT_FOUND, UNRECOGNIZED};
use crate::completion::{parse_reply, CompletionDriver, CompletionError};
use crate::dice::{pick, Dice, ThreadDice};
use crate::file_logger::FileLogger;
use crate::models::{CompletionRequest, ModelCatalog};
use crate::mood_engine::{is_mood_query, next_mood};
use crate::moods::{Mood, MoodTable};
use crate::phrases::PhraseSets;
use crate::session::SessionRegistry;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct AccessList {
    whitelisted: HashSet<u64>,
    privileged: HashSet<u64>,
}

impl AccessList {
    pub fn new(
        whitelisted: impl IntoIterator<Item = u64>,
        privileged: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            whitelisted: whitelisted.into_iter().collect(),
            privileged: privileged.into_iter().collect(),
        }
    }

    pub fn is_whitelisted(&self, user_id: u64) -> bool {
        self.whitelisted.contains(&user_id)
    }

    pub fn is_privileged(&self, user_id: u64) -> bool {
        self.privileged.contains(&user_id)
    }
}

#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: String,
    pub author: String,
    pub author_id: u64,
    pub content: String,
}

#[derive(Debug)]
pub enum MessageOutcome {
    /// The bot is powered off; nothing was recorded.
    Ignored,
    /// Recorded in history, but the author does not get answers.
    Recorded,
    MoodReport(Mood),
    Reply(String),
    /// The completion failed; the channel hears nothing.
    Suppressed(CompletionError),
}

impl MessageOutcome {
    /// Text to post back to the channel, if any.
    pub fn render(&self) -> Option<String> {
        match self {
            MessageOutcome::MoodReport(mood) => Some(format!("I am {} right now.", mood)),
            MessageOutcome::Reply(text) => Some(text.clone()),
            _ => None,
        }
    }
}

/// Everything the bot knows, shared by every event handler.
pub struct Relay {
    sessions: SessionRegistry,
    ai_enabled: AtomicBool,
    model: RwLock<String>,
    catalog: ModelCatalog,
    moods: MoodTable,
    phrases: PhraseSets,
    access: AccessList,
    bot_user_id: u64,
    dice: Mutex<Box<dyn Dice>>,
    driver: Arc<dyn CompletionDriver>,
    timeout: Duration,
    transcript: Option<FileLogger>,
}

impl Relay {
    pub fn new(
        moods: MoodTable,
        phrases: PhraseSets,
        catalog: ModelCatalog,
        access: AccessList,
        bot_user_id: u64,
        driver: Arc<dyn CompletionDriver>,
    ) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            ai_enabled: AtomicBool::new(false),
            model: RwLock::new(catalog.model.clone()),
            catalog,
            moods,
            phrases,
            access,
            bot_user_id,
            dice: Mutex::new(Box::new(ThreadDice::new())),
            driver,
            timeout: Duration::from_secs(30),
            transcript: None,
        }
    }

    #[cfg(test)]
    pub fn with_dice(mut self, dice: Box<dyn Dice>) -> Self {
        self.dice = Mutex::new(dice);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_transcript(mut self, transcript: FileLogger) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.ai_enabled.load(Ordering::SeqCst)
    }

    pub async fn model(&self) -> String {
        self.model.read().await.clone()
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Whether messages from this user are answered.
    pub fn responds_to(&self, author_id: u64) -> bool {
        self.access.is_whitelisted(author_id) && author_id != self.bot_user_id
    }

    fn dice(&self) -> MutexGuard<'_, Box<dyn Dice>> {
        self.dice.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn handle_message(&self, message: InboundMessage) -> MessageOutcome {
        if !self.is_enabled() {
            return MessageOutcome::Ignored;
        }

        let session = self
            .sessions
            .get_or_create(&message.channel_id, &self.moods)
            .await;

        // Record, answer mood queries and shift mood under the channel lock so the
        // prompt reflects exactly this message.
        let prompt = {
            let mut session = session.lock().await;
            session.history.add_entry(&message.author, &message.content);
            info!("Message: {}", message.content);
            info!("Author: {}", message.author);
            if let Some(transcript) = &self.transcript {
                transcript.log_message(&message.channel_id, &message.author, &message.content);
            }

            if !self.responds_to(message.author_id) {
                return MessageOutcome::Recorded;
            }

            let text_lower = message.content.to_lowercase();
            let current = session.history.mood();
            if is_mood_query(&text_lower) {
                return MessageOutcome::MoodReport(current);
            }

            let next = next_mood(current, &text_lower, &self.phrases, self.dice().as_mut());
            if let Some(next) = next {
                session.history.change_mood(next.as_str(), &self.moods);
                info!(
                    "Mood in channel {} changed from {} to {}",
                    session.channel_id,
                    current,
                    session.history.mood()
                );
                if let Some(transcript) = &self.transcript {
                    transcript.log_mood(
                        &session.channel_id,
                        current.as_str(),
                        session.history.mood().as_str(),
                    );
                }
            }

            session.history.render_prompt()
        };

        let model = self.model().await;
        let request = CompletionRequest {
            params: self.catalog.params(&model),
            model,
            prompt,
        };
        debug!("Prompt: {}", request.prompt);

        match self.complete(request).await {
            Ok(reply) => {
                info!("Response: {}", reply);
                if let Some(transcript) = &self.transcript {
                    transcript.log_reply(&message.channel_id, &reply);
                }
                MessageOutcome::Reply(reply)
            }
            Err(e) => {
                match &e {
                    CompletionError::Overloaded(_) => error!("Error: {}", e),
                    _ => warn!("Dropping reply for channel {}: {}", message.channel_id, e),
                }
                if let Some(transcript) = &self.transcript {
                    transcript.log_error(&e.to_string());
                }
                MessageOutcome::Suppressed(e)
            }
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = tokio::time::timeout(self.timeout, self.driver.complete(request))
            .await
            .map_err(|_| CompletionError::TimedOut(self.timeout))??;
        parse_reply(&body)
    }

    pub async fn handle_command(&self, user_id: u64, command: Command) -> String {
        let privileged = self.access.is_privileged(user_id);
        info!("Command {:?} from {} (privileged: {})", command, user_id, privileged);

        if command.is_privileged() && !privileged {
            info!("Not a privileged user");
            return ACCESS_DENIED.to_string();
        }

        match command {
            Command::Ping => "Pong!".to_string(),
            Command::Model => format!("Model: {}", self.model().await),
            Command::Enable => self.set_enabled(true, user_id),
            Command::Disable => self.set_enabled(false, user_id),
            Command::SetModel(model) => self.set_model(&model, user_id).await,
            Command::Unknown(name) => {
                info!("Not a valid command: {}", name);
                UNRECOGNIZED.to_string()
            }
        }
    }

    fn set_enabled(&self, enabled: bool, user_id: u64) -> String {
        info!("{} AI", if enabled { "Enabling" } else { "Disabling" });
        self.ai_enabled.store(enabled, Ordering::SeqCst);
        if let Some(transcript) = &self.transcript {
            transcript.log_power(enabled, user_id);
        }

        let pool = if enabled {
            &self.phrases.power.on
        } else {
            &self.phrases.power.off
        };
        match pick(self.dice().as_mut(), pool) {
            Some(phrase) => phrase.clone(),
            None if enabled => "AI enabled.".to_string(),
            None => "AI disabled.".to_string(),
        }
    }

    async fn set_model(&self, model: &str, user_id: u64) -> String {
        info!("New model: {}", model);
        if !self.catalog.contains(model) {
            return MODEL_NOT_FOUND.to_string();
        }
        *self.model.write().await = model.to_string();
        if let Some(transcript) = &self.transcript {
            transcript.log_model(model, user_id);
        }
        format!("Model set to: {}", model)
    }
}
