//! Answer resolution
//!
//! Maps a typed answer to at most one unclaimed zombie and fires a laser
//! at it.

use thiserror::Error;

use super::events::GameEvent;
use super::state::{AttemptOutcome, AttemptRecord, GameState, Laser, Zombie, ZombieId};

/// Reasons a submission is rejected without touching the session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("the game is not running")]
    NotRunning,
    #[error("type an answer first")]
    Empty,
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
}

/// Result of an accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The zombie now claimed by a fresh laser
    Hit(ZombieId),
    Miss,
}

/// Parse the raw input field. Accepts anything that reads as a finite
/// number, so "2.5" is a valid (if hopeless) answer.
pub fn parse_answer(raw: &str) -> Result<f64, SubmitError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SubmitError::NotANumber(trimmed.to_string())),
    }
}

/// Pick the target for an answer: the unclaimed zombie with that answer
/// lowest on screen (largest y). Equal heights keep the earliest spawned.
pub fn find_target(zombies: &[Zombie], value: f64) -> Option<ZombieId> {
    let mut best: Option<&Zombie> = None;
    for zombie in zombies {
        if zombie.claimed || zombie.answer as f64 != value {
            continue;
        }
        if best.is_none_or(|b| zombie.pos.y > b.pos.y) {
            best = Some(zombie);
        }
    }
    best.map(|z| z.id)
}

/// Submit an answer typed by the player
///
/// On a hit the zombie is claimed and a laser leaves the muzzle; on a miss
/// only the miss counter moves. Both outcomes are appended to the attempt
/// log. Rejected input changes nothing.
pub fn submit_answer(
    state: &mut GameState,
    raw: &str,
    now_ms: f64,
) -> Result<Resolution, SubmitError> {
    if !state.is_running() {
        return Err(SubmitError::NotRunning);
    }
    let value = parse_answer(raw)?;

    let elapsed_secs = ((now_ms - state.last_answer_ms) / 1000.0).max(0.0);
    let response_time_secs = (elapsed_secs * 100.0).round() / 100.0;
    state.last_answer_ms = now_ms;

    let target = find_target(&state.zombies, value)
        .and_then(|id| state.zombies.iter_mut().find(|z| z.id == id));

    let (resolution, question, operator, expected) = match target {
        Some(zombie) => {
            zombie.claimed = true;
            let id = zombie.id;
            let question = zombie.question.clone();
            let operator = zombie.operator;
            let answer = zombie.answer;

            let muzzle = state.arena.muzzle();
            state.lasers.push(Laser::new(muzzle, id));
            state.profile.hits += 1;
            state.push_event(GameEvent::LaserFired(id));
            log::debug!("Answer {} claimed zombie {:?}", value, id);
            (Resolution::Hit(id), question, Some(operator), Some(answer))
        }
        None => {
            state.profile.misses += 1;
            state.push_event(GameEvent::NoMatch);
            // Nothing matched; keep the oldest visible question for context
            let first = state.zombies.first();
            (
                Resolution::Miss,
                first.map(|z| z.question.clone()).unwrap_or_default(),
                first.map(|z| z.operator),
                first.map(|z| z.answer),
            )
        }
    };

    let outcome = match resolution {
        Resolution::Hit(_) => AttemptOutcome::Correct,
        Resolution::Miss => AttemptOutcome::Wrong,
    };
    state.attempts.push(AttemptRecord {
        name: state.profile.name.clone(),
        age: state.profile.age,
        phase: state.phase,
        question,
        operator,
        expected,
        submitted: value,
        outcome,
        response_time_secs,
    });

    Ok(resolution)
}
