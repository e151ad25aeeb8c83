//! Events raised by the simulation for the shell to act on
//!
//! The simulation never touches audio, DOM or network directly; it queues
//! these and the shell drains them after each tick or submission.

use serde::{Deserialize, Serialize};

use super::state::ZombieId;
use crate::audio::SoundEffect;

/// End-of-game summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub name: String,
    pub age: u32,
    pub score: u32,
    pub phase: u32,
    pub hits: u32,
    pub misses: u32,
}

impl GameSummary {
    /// Text shown in the game-over notification
    pub fn message(&self) -> String {
        format!(
            "Game Over!\nScore: {}\nName: {}\nAge: {}",
            self.score, self.name, self.age
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    ZombieSpawned(ZombieId),
    /// A submission matched and a laser is on its way
    LaserFired(ZombieId),
    /// A submission matched nothing
    NoMatch,
    ZombieDestroyed(ZombieId),
    /// A zombie reached the bottom; carries lives left
    LifeLost(u32),
    PhaseAdvanced(u32),
    GameOver(GameSummary),
}

impl GameEvent {
    /// Status line for the message area, if the event has one
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::LaserFired(_) => Some("Laser fired!".to_string()),
            GameEvent::NoMatch => Some("No zombie has that answer.".to_string()),
            GameEvent::ZombieDestroyed(_) => Some("Zombie destroyed!".to_string()),
            GameEvent::PhaseAdvanced(phase) => Some(format!("You reached phase {}!", phase)),
            _ => None,
        }
    }

    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            GameEvent::LaserFired(_) => Some(SoundEffect::LaserFire),
            GameEvent::ZombieDestroyed(_) => Some(SoundEffect::Explosion),
            GameEvent::LifeLost(_) => Some(SoundEffect::LifeLost),
            GameEvent::PhaseAdvanced(_) => Some(SoundEffect::PhaseUp),
            GameEvent::GameOver(_) => Some(SoundEffect::GameOver),
            _ => None,
        }
    }

    /// Whether the HUD (score, phase, lives) needs a refresh
    pub fn refreshes_hud(&self) -> bool {
        matches!(
            self,
            GameEvent::SessionStarted
                | GameEvent::ZombieDestroyed(_)
                | GameEvent::LifeLost(_)
                | GameEvent::PhaseAdvanced(_)
                | GameEvent::GameOver(_)
        )
    }
}
