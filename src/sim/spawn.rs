//! Zombie spawning
//!
//! Spawns are driven by a timer outside the frame loop. In the browser that
//! is a `setInterval`; headless runs use [`SpawnTimer`].

use rand::Rng;

use super::events::GameEvent;
use super::question::generate_question;
use super::state::{GameState, Zombie, ZombieId};
use crate::consts::SPAWN_INTERVAL_MS;

/// Spawn one zombie at the top edge. Returns `None` once the session is not
/// running, so a late timer callback cannot add zombies after game over.
pub fn spawn_zombie(state: &mut GameState) -> Option<ZombieId> {
    if !state.is_running() {
        return None;
    }

    let phase = state.phase;
    let question = generate_question(phase, &mut state.rng);
    let x = state.rng.random::<f32>() * state.arena.spawn_span();
    // Faster on average in later phases, randomized so zombies don't march in rows
    let speed = 1.0 + state.rng.random::<f32>() * phase as f32;

    let id = state.next_zombie_id();
    log::debug!("Spawned zombie {:?}: {} (speed {:.2})", id, question.text, speed);
    state.zombies.push(Zombie::new(id, x, question, speed));
    state.push_event(GameEvent::ZombieSpawned(id));
    Some(id)
}

/// Fixed-interval spawn clock fed with elapsed wall time
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval_ms: f64,
    elapsed_ms: f64,
    cancelled: bool,
}

impl Default for SpawnTimer {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL_MS)
    }
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
            cancelled: false,
        }
    }

    /// Advance by `delta_ms`; returns how many spawns are due
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if self.cancelled || self.interval_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        let mut fires = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fires += 1;
        }
        fires
    }

    /// Stop firing for good. Returns true only on the first call.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
