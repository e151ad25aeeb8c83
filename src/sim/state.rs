//! Game state and core simulation types
//!
//! Everything a session owns lives in [`GameState`]; the browser shell and
//! the headless runner only hold it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events::{GameEvent, GameSummary};
use super::question::{Operator, Question};
use crate::consts::*;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Waiting for the player profile
    NotStarted,
    /// Active gameplay
    Running,
    /// Lives exhausted; only a full reset leaves this state
    GameOver,
}

/// Stable handle to a zombie. Ids are never reused within a session, so a
/// stale handle simply stops resolving once its zombie is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(pub u32);

/// Drawing area the game plays in (canvas pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zombies whose top edge passes this line cost a life
    pub fn bottom_boundary(&self) -> f32 {
        self.height - CANNON_HEIGHT
    }

    /// Point lasers are fired from
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - CANNON_HEIGHT)
    }

    /// Horizontal range a zombie's left edge may spawn in
    pub fn spawn_span(&self) -> f32 {
        (self.width - ZOMBIE_WIDTH).max(0.0)
    }
}

/// A falling zombie carrying a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub id: ZombieId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub question: String,
    pub operator: Operator,
    pub answer: i64,
    /// Pixels per frame, fixed at spawn
    pub speed: f32,
    /// Already targeted by an in-flight laser
    pub claimed: bool,
}

impl Zombie {
    pub fn new(id: ZombieId, x: f32, question: Question, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, 0.0),
            size: Vec2::new(ZOMBIE_WIDTH, ZOMBIE_HEIGHT),
            question: question.text,
            operator: question.operator,
            answer: question.answer,
            speed,
            claimed: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Fall by one step.
    ///
    /// Zombie speed is per rendered frame and ignores the frame delta, while
    /// lasers are delta-scaled. The mismatch is kept deliberately: on slow
    /// displays zombies fall slower in wall-clock time but lasers do not.
    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn crossed(&self, arena: &Arena) -> bool {
        self.pos.y > arena.bottom_boundary()
    }
}

/// A homing laser locked onto one zombie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub pos: Vec2,
    pub target: ZombieId,
    /// Pixels per baseline frame
    pub speed: f32,
    pub done: bool,
}

impl Laser {
    pub fn new(pos: Vec2, target: ZombieId) -> Self {
        Self {
            pos,
            target,
            speed: LASER_SPEED,
            done: false,
        }
    }

    /// Home toward the target centre, or finish if the target is gone.
    ///
    /// Snaps onto the target once the remaining distance fits in one step,
    /// so the laser never orbits around it.
    pub fn home(&mut self, target_center: Option<Vec2>, delta_ms: f32) {
        let Some(target) = target_center else {
            self.done = true;
            return;
        };

        let to_target = target - self.pos;
        let dist = to_target.length();
        let step = self.speed * (delta_ms / BASELINE_FRAME_MS);

        if dist <= step {
            self.pos = target;
            self.done = true;
            return;
        }

        self.pos += to_target / dist * step;
    }

    /// Angle (radians) from the laser toward a point
    pub fn heading(&self, target_center: Vec2) -> f32 {
        let d = target_center - self.pos;
        d.y.atan2(d.x)
    }
}

/// Profile validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("please enter your name")]
    EmptyName,
    #[error("please enter a valid age")]
    InvalidAge,
}

/// Player identity and running statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub age: u32,
    pub hits: u32,
    pub misses: u32,
}

impl PlayerProfile {
    pub fn new(name: &str, age: u32) -> Result<Self, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if age == 0 {
            return Err(ProfileError::InvalidAge);
        }
        Ok(Self {
            name: name.to_string(),
            age,
            hits: 0,
            misses: 0,
        })
    }

    /// Parse the raw modal fields (age as typed)
    pub fn from_form(name: &str, age: &str) -> Result<Self, ProfileError> {
        let age = age
            .trim()
            .parse::<u32>()
            .map_err(|_| ProfileError::InvalidAge)?;
        Self::new(name, age)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Correct,
    Wrong,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Correct => "correct",
            AttemptOutcome::Wrong => "wrong",
        }
    }
}

/// One answer submission, kept for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub name: String,
    pub age: u32,
    pub phase: u32,
    /// Matched question on a hit; first active question (or empty) on a miss
    pub question: String,
    pub operator: Option<Operator>,
    pub expected: Option<i64>,
    pub submitted: f64,
    pub outcome: AttemptOutcome,
    /// Seconds since the previous submission, two decimals
    pub response_time_secs: f64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub arena: Arena,
    pub status: SessionStatus,
    pub score: u32,
    pub lives: u32,
    /// Difficulty tier, starts at 1
    pub phase: u32,
    pub zombies: Vec<Zombie>,
    pub lasers: Vec<Laser>,
    pub profile: PlayerProfile,
    pub attempts: Vec<AttemptRecord>,
    /// Wall-clock ms of the previous submission (or session start)
    pub last_answer_ms: f64,
    pub rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session waiting for a profile
    pub fn new(arena: Arena, seed: u64) -> Self {
        Self {
            arena,
            status: SessionStatus::NotStarted,
            score: 0,
            lives: STARTING_LIVES,
            phase: 1,
            zombies: Vec::new(),
            lasers: Vec::new(),
            profile: PlayerProfile::default(),
            attempts: Vec::new(),
            last_answer_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// NotStarted -> Running. Ignored from any other status.
    pub fn start(&mut self, profile: PlayerProfile, now_ms: f64) -> bool {
        if self.status != SessionStatus::NotStarted {
            log::warn!("Ignoring start request in {:?}", self.status);
            return false;
        }
        log::info!("Session started for {} (age {})", profile.name, profile.age);
        self.profile = profile;
        self.last_answer_ms = now_ms;
        self.status = SessionStatus::Running;
        self.push_event(GameEvent::SessionStarted);
        true
    }

    /// Full restart: back to NotStarted with a new seed, same arena
    pub fn reset(&mut self, seed: u64) {
        *self = Self::new(self.arena, seed);
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Allocate a new zombie id
    pub fn next_zombie_id(&mut self) -> ZombieId {
        let id = ZombieId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn zombie(&self, id: ZombieId) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.id == id)
    }

    pub fn zombie_mut(&mut self, id: ZombieId) -> Option<&mut Zombie> {
        self.zombies.iter_mut().find(|z| z.id == id)
    }

    pub fn remove_zombie(&mut self, id: ZombieId) -> Option<Zombie> {
        let idx = self.zombies.iter().position(|z| z.id == id)?;
        Some(self.zombies.remove(idx))
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            name: self.profile.name.clone(),
            age: self.profile.age,
            score: self.score,
            phase: self.phase,
            hits: self.profile.hits,
            misses: self.profile.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_validation() {
        assert_eq!(
            PlayerProfile::new("   ", 10).unwrap_err(),
            ProfileError::EmptyName
        );
        assert_eq!(
            PlayerProfile::new("Ana", 0).unwrap_err(),
            ProfileError::InvalidAge
        );
        assert_eq!(
            PlayerProfile::from_form("Ana", "abc").unwrap_err(),
            ProfileError::InvalidAge
        );

        let profile = PlayerProfile::from_form("  Ana ", " 9").unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.age, 9);
        assert_eq!(profile.hits, 0);
    }

    #[test]
    fn test_start_only_from_not_started() {
        let mut state = GameState::new(Arena::default(), 1);
        assert!(!state.is_running());

        let profile = PlayerProfile::new("Ana", 9).unwrap();
        assert!(state.start(profile.clone(), 1000.0));
        assert!(state.is_running());
        assert_eq!(state.last_answer_ms, 1000.0);

        assert!(!state.start(profile, 2000.0));
        assert_eq!(state.last_answer_ms, 1000.0);
    }

    #[test]
    fn test_zombie_ids_never_reused() {
        let mut state = GameState::new(Arena::default(), 1);
        let a = state.next_zombie_id();
        let b = state.next_zombie_id();
        assert_ne!(a, b);

        let q = Question::new(1, 1, Operator::Addition);
        state.zombies.push(Zombie::new(a, 0.0, q, 1.0));
        assert!(state.remove_zombie(a).is_some());
        assert!(state.zombie(a).is_none());
        assert!(state.remove_zombie(a).is_none());
        assert_ne!(state.next_zombie_id(), a);
    }

    #[test]
    fn test_laser_snaps_when_close() {
        let mut laser = Laser::new(Vec2::new(0.0, 0.0), ZombieId(1));
        laser.home(Some(Vec2::new(5.0, 0.0)), 16.0);
        assert!(laser.done);
        assert_eq!(laser.pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_laser_step_scales_with_delta() {
        let mut laser = Laser::new(Vec2::new(0.0, 0.0), ZombieId(1));
        laser.home(Some(Vec2::new(100.0, 0.0)), 32.0);
        assert!(!laser.done);
        assert!((laser.pos.x - 24.0).abs() < 1e-4);
        assert_eq!(laser.pos.y, 0.0);
    }

    #[test]
    fn test_laser_without_target_finishes() {
        let mut laser = Laser::new(Vec2::new(10.0, 10.0), ZombieId(3));
        laser.home(None, 16.0);
        assert!(laser.done);
        assert_eq!(laser.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_reset_keeps_arena() {
        let arena = Arena::new(640.0, 480.0);
        let mut state = GameState::new(arena, 5);
        state.start(PlayerProfile::new("Ana", 9).unwrap(), 0.0);
        state.score = 12;
        state.reset(6);
        assert_eq!(state.status, SessionStatus::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.arena, arena);
    }
}
