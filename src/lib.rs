//! Zombie Math - an arithmetic shooter for the browser
//!
//! Core modules:
//! - `sim`: Game simulation (spawning, answer resolution, homing lasers)
//! - `render`: Draw-call generation against an abstract surface, HUD text
//! - `export`: Attempt log serialization and upload
//! - `audio`: Procedural sound effects (Web Audio)
//! - `settings`: Player preferences

pub mod audio;
pub mod export;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Lives at session start
    pub const STARTING_LIVES: u32 = 5;
    /// Milliseconds between zombie spawns
    pub const SPAWN_INTERVAL_MS: f64 = 2500.0;
    /// Score needed per phase advance
    pub const POINTS_PER_PHASE: u32 = 10;

    /// Zombie sprite size
    pub const ZOMBIE_WIDTH: f32 = 50.0;
    pub const ZOMBIE_HEIGHT: f32 = 70.0;

    /// Cannon sprite size (sits at the bottom centre)
    pub const CANNON_WIDTH: f32 = 60.0;
    pub const CANNON_HEIGHT: f32 = 60.0;

    /// Laser speed in pixels per baseline frame
    pub const LASER_SPEED: f32 = 12.0;
    /// Laser sprite size
    pub const LASER_WIDTH: f32 = 80.0;
    pub const LASER_HEIGHT: f32 = 40.0;

    /// Frame duration the laser speed is expressed against
    pub const BASELINE_FRAME_MS: f32 = 16.0;
    /// Longest frame delta fed to the simulation (tab switches, stalls)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Default canvas size when none is supplied
    pub const DEFAULT_ARENA_WIDTH: f32 = 800.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 600.0;
}
