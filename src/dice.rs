use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random choice the bot makes.
pub trait Dice: Send {
    /// Returns an index in `0..sides`. `sides` is never zero.
    fn roll(&mut self, sides: usize) -> usize;
}

pub struct ThreadDice {
    rng: StdRng,
}

impl ThreadDice {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Dice for ThreadDice {
    fn roll(&mut self, sides: usize) -> usize {
        self.rng.gen_range(0..sides)
    }
}

/// Picks one item uniformly, or `None` for an empty slice.
pub fn pick<'a, T>(dice: &mut dyn Dice, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(dice.roll(items.len()))
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedDice;
    use super::*;

    #[test]
    fn test_pick_follows_rolls() {
        let items = ["a", "b", "c"];
        let mut dice = ScriptedDice::new(&[2, 0]);
        assert_eq!(pick(&mut dice, &items), Some(&"c"));
        assert_eq!(pick(&mut dice, &items), Some(&"a"));
    }

    #[test]
    fn test_pick_empty_does_not_roll() {
        let items: [&str; 0] = [];
        let mut dice = ScriptedDice::new(&[]);
        assert_eq!(pick(&mut dice, &items), None);
        assert_eq!(dice.calls, 0);
    }

    #[test]
    fn test_thread_dice_stays_in_range() {
        let mut dice = ThreadDice::new();
        for _ in 0..100 {
            assert!(dice.roll(2) < 2);
        }
    }
}
