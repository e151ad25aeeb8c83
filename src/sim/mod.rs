//! Game simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Frame delta and wall-clock times are passed in by the caller
//! - Seeded RNG only
//! - Side effects (sounds, messages, HUD refresh) are reported as events

pub mod autoplay;
pub mod events;
pub mod question;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autoplay::Autoplayer;
pub use events::{GameEvent, GameSummary};
pub use question::{Operator, Question, generate_question};
pub use resolve::{Resolution, SubmitError, submit_answer};
pub use spawn::{SpawnTimer, spawn_zombie};
pub use state::{
    Arena, AttemptOutcome, AttemptRecord, GameState, Laser, PlayerProfile, ProfileError,
    SessionStatus, Zombie, ZombieId,
};
pub use tick::tick;
