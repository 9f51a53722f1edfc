use crate::dice::{pick, Dice};
use crate::moods::Mood;
use crate::phrases::PhraseSets;

/// Phrase that makes the bot report its mood instead of answering.
pub const MOOD_QUERY: &str = "what mood are you";

pub fn is_mood_query(text_lower: &str) -> bool {
    text_lower.contains(MOOD_QUERY)
}

/// Decides the mood after `text_lower` is said to a bot in `current`.
///
/// Neutral moods scan the bad phrases and negative moods scan the good ones.
/// Every matching phrase rolls a fresh target from the opposite partition and
/// the last roll wins. Returns `None` when nothing matched.
pub fn next_mood(
    current: Mood,
    text_lower: &str,
    phrases: &PhraseSets,
    dice: &mut dyn Dice,
) -> Option<Mood> {
    let (triggers, candidates): (&[String], &[Mood]) = if current.is_neutral() {
        (phrases.bad.as_slice(), Mood::NEGATIVE)
    } else if current.is_negative() {
        (phrases.good.as_slice(), Mood::NEUTRAL)
    } else {
        return None;
    };

    let mut next = None;
    for _ in PhraseSets::matches(triggers, text_lower) {
        next = pick(dice, candidates).copied().or(next);
    }
    next
}
