use crate::config::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Default,
    Chappie,
    Angry,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Default, Mood::Chappie, Mood::Angry, Mood::Sad];

    /// Moods in which hurtful phrases can sour the bot.
    pub const NEUTRAL: &'static [Mood] = &[Mood::Chappie, Mood::Default];

    /// Moods in which kind phrases can cheer the bot up.
    pub const NEGATIVE: &'static [Mood] = &[Mood::Angry, Mood::Sad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Default => "default",
            Mood::Chappie => "chappie",
            Mood::Angry => "angry",
            Mood::Sad => "sad",
        }
    }

    pub fn is_neutral(&self) -> bool {
        Self::NEUTRAL.contains(self)
    }

    pub fn is_negative(&self) -> bool {
        Self::NEGATIVE.contains(self)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| format!("unknown mood '{}'", s))
    }
}

/// Preamble text for each mood. Always holds an entry for `Mood::Default`.
#[derive(Debug, Clone)]
pub struct MoodTable {
    preambles: HashMap<Mood, String>,
}

impl MoodTable {
    pub fn new(preambles: HashMap<Mood, String>) -> Result<Self, ConfigError> {
        if !preambles.contains_key(&Mood::Default) {
            return Err(ConfigError::MissingDefaultMood);
        }
        Ok(Self { preambles })
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let entries: HashMap<String, String> = serde_json::from_str(raw)?;
        let mut preambles = HashMap::new();
        for (key, preamble) in entries {
            match key.parse::<Mood>() {
                Ok(mood) => {
                    preambles.insert(mood, preamble);
                }
                Err(e) => warn!("Skipping mood table entry: {}", e),
            }
        }
        Self::new(preambles)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn lookup(&self, mood: Mood) -> Option<&str> {
        self.preambles.get(&mood).map(String::as_str)
    }

    pub fn default_preamble(&self) -> &str {
        self.lookup(Mood::Default).unwrap_or_default()
    }

    /// Maps a mood name to its table entry, falling back to the default mood
    /// when the name is unknown or the table has no preamble for it.
    pub fn resolve(&self, key: &str) -> (Mood, &str) {
        key.parse::<Mood>()
            .ok()
            .and_then(|mood| self.lookup(mood).map(|preamble| (mood, preamble)))
            .unwrap_or((Mood::Default, self.default_preamble()))
    }
}
