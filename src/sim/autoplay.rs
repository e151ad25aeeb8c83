//! Demo player
//!
//! Answers the lowest unclaimed zombie after a fixed think time, getting
//! it wrong now and then. Drives the headless native runner.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::GameState;

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    /// Chance of typing the right answer
    pub accuracy: f64,
    /// Delay between answers
    pub think_ms: f32,
    cooldown_ms: f32,
}

impl Autoplayer {
    pub fn new(seed: u64, accuracy: f64, think_ms: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            think_ms,
            cooldown_ms: think_ms,
        }
    }

    /// Advance the think timer; returns the text to submit when ready
    pub fn advance(&mut self, state: &GameState, delta_ms: f32) -> Option<String> {
        self.cooldown_ms -= delta_ms;
        if self.cooldown_ms > 0.0 || !state.is_running() {
            return None;
        }

        let target = state
            .zombies
            .iter()
            .filter(|z| !z.claimed)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        self.cooldown_ms = self.think_ms;
        let answer = if self.rng.random_bool(self.accuracy) {
            target.answer
        } else {
            target.answer + 1
        };
        Some(answer.to_string())
    }
}
