use crate::config::ConfigError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowerPhrases {
    #[serde(default)]
    pub on: Vec<String>,
    #[serde(default)]
    pub off: Vec<String>,
}

/// Trigger phrases for mood changes plus power flavor text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhraseSets {
    /// Phrases that sour a neutral mood.
    #[serde(default)]
    pub bad: Vec<String>,
    /// Phrases that lift a negative mood.
    #[serde(default)]
    pub good: Vec<String>,
    #[serde(default)]
    pub power: PowerPhrases,
}

impl PhraseSets {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let phrases: PhraseSets = serde_json::from_str(raw)?;
        Ok(phrases.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Trigger phrases are matched against lowercased messages, so store them lowercased.
    pub fn normalized(mut self) -> Self {
        for phrase in self.bad.iter_mut().chain(self.good.iter_mut()) {
            *phrase = phrase.to_lowercase();
        }
        self
    }

    /// Every phrase in `list` that occurs in `text_lower`, in list order.
    pub fn matches<'a>(list: &'a [String], text_lower: &'a str) -> impl Iterator<Item = &'a str> {
        list.iter()
            .map(String::as_str)
            .filter(move |phrase| !phrase.is_empty() && text_lower.contains(phrase))
    }
}
