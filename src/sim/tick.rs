//! Per-frame simulation step
//!
//! Core game loop: move zombies, take lives at the bottom edge, home the
//! lasers and score arrivals.

use super::events::GameEvent;
use super::state::{GameState, SessionStatus, ZombieId};
use crate::consts::*;

/// Advance the game by one rendered frame.
///
/// `delta_ms` is the time since the previous frame. It scales laser motion
/// only; zombies move a fixed amount per frame (see [`super::Zombie::advance`]).
/// Does nothing unless the session is running.
pub fn tick(state: &mut GameState, delta_ms: f32) {
    if !state.is_running() {
        return;
    }
    let delta_ms = delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS);

    update_zombies(state);
    if !state.is_running() {
        return;
    }
    update_lasers(state, delta_ms);
}

fn update_zombies(state: &mut GameState) {
    for zombie in &mut state.zombies {
        zombie.advance();
    }

    let arena = state.arena;
    let crossed: Vec<ZombieId> = state
        .zombies
        .iter()
        .filter(|z| z.crossed(&arena))
        .map(|z| z.id)
        .collect();

    for id in crossed {
        state.remove_zombie(id);
        state.lives = state.lives.saturating_sub(1);
        log::info!("Zombie {:?} got through, {} lives left", id, state.lives);
        state.push_event(GameEvent::LifeLost(state.lives));

        if state.lives == 0 {
            end_game(state);
            return;
        }
    }
}

fn update_lasers(state: &mut GameState, delta_ms: f32) {
    // Nothing else can touch the collections mid-frame, so work on a detached copy
    let mut lasers = std::mem::take(&mut state.lasers);

    for laser in &mut lasers {
        // Target may have been removed since the last frame (e.g. it got through)
        let target_center = state.zombie(laser.target).map(|z| z.center());
        laser.home(target_center, delta_ms);

        if laser.done && state.remove_zombie(laser.target).is_some() {
            award_kill(state, laser.target);
        }
    }

    lasers.retain(|l| !l.done);
    state.lasers = lasers;
}

fn award_kill(state: &mut GameState, id: ZombieId) {
    state.score += 1;
    state.push_event(GameEvent::ZombieDestroyed(id));

    // Only future spawns see the new phase; zombies already falling keep theirs
    if state.score % POINTS_PER_PHASE == 0 {
        state.phase += 1;
        log::info!("Phase {} reached at score {}", state.phase, state.score);
        state.push_event(GameEvent::PhaseAdvanced(state.phase));
    }
}

/// Running -> GameOver. Terminal until a full reset.
fn end_game(state: &mut GameState) {
    state.status = SessionStatus::GameOver;
    let summary = state.summary();
    log::info!(
        "Game over: {} scored {} (phase {}, {} hits, {} misses)",
        summary.name,
        summary.score,
        summary.phase,
        summary.hits,
        summary.misses
    );
    state.push_event(GameEvent::GameOver(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::question::{Operator, Question};
    use crate::sim::resolve::{Resolution, submit_answer};
    use crate::sim::spawn::{SpawnTimer, spawn_zombie};
    use crate::sim::state::{Arena, Laser, PlayerProfile, Zombie};
    use glam::Vec2;

    const FRAME: f32 = 16.0;

    fn running_state() -> GameState {
        let mut state = GameState::new(Arena::new(800.0, 600.0), 12345);
        state.start(PlayerProfile::new("Ana", 9).unwrap(), 0.0);
        state.drain_events();
        state
    }

    fn add_zombie(state: &mut GameState, question: Question, y: f32, speed: f32) -> ZombieId {
        let id = state.next_zombie_id();
        let mut zombie = Zombie::new(id, 375.0, question, speed);
        zombie.pos.y = y;
        state.zombies.push(zombie);
        id
    }

    fn run_until_lasers_done(state: &mut GameState) {
        for _ in 0..500 {
            if state.lasers.is_empty() {
                return;
            }
            tick(state, FRAME);
        }
        panic!("lasers never finished");
    }

    #[test]
    fn test_tick_ignored_before_start() {
        let mut state = GameState::new(Arena::default(), 1);
        let id = state.next_zombie_id();
        state
            .zombies
            .push(Zombie::new(id, 0.0, Question::new(1, 1, Operator::Addition), 2.0));
        tick(&mut state, FRAME);
        assert_eq!(state.zombies[0].pos.y, 0.0);
    }

    #[test]
    fn test_zombie_fall_ignores_delta() {
        let mut state = running_state();
        let id = add_zombie(&mut state, Question::new(1, 1, Operator::Addition), 0.0, 3.0);
        tick(&mut state, 16.0);
        assert_eq!(state.zombie(id).unwrap().pos.y, 3.0);
        tick(&mut state, 64.0);
        assert_eq!(state.zombie(id).unwrap().pos.y, 6.0);
    }

    #[test]
    fn test_crossing_costs_one_life() {
        let mut state = running_state();
        add_zombie(&mut state, Question::new(1, 1, Operator::Addition), 539.5, 1.0);
        add_zombie(&mut state, Question::new(2, 2, Operator::Addition), 10.0, 1.0);

        tick(&mut state, FRAME);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.zombies.len(), 1);
        assert!(state.is_running());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LifeLost(STARTING_LIVES - 1)]
        );
    }

    #[test]
    fn test_last_life_ends_game_and_spawning() {
        let mut state = running_state();
        state.lives = 1;
        add_zombie(&mut state, Question::new(1, 1, Operator::Addition), 540.0, 1.0);
        add_zombie(&mut state, Question::new(2, 2, Operator::Addition), 540.0, 1.0);

        tick(&mut state, FRAME);
        assert_eq!(state.lives, 0);
        assert!(!state.is_running());
        assert_eq!(state.status, SessionStatus::GameOver);

        let events = state.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver(s)) if s.name == "Ana"));

        // The shell cancels its timer on GameOver; a stray callback is still refused
        let mut timer = SpawnTimer::default();
        assert!(timer.cancel());
        assert_eq!(timer.advance(10_000.0), 0);
        assert!(spawn_zombie(&mut state).is_none());

        // Frozen: further ticks change nothing
        let zombies_before = state.zombies.len();
        tick(&mut state, FRAME);
        assert_eq!(state.zombies.len(), zombies_before);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_laser_destroys_target_and_scores() {
        let mut state = running_state();
        let id = add_zombie(&mut state, Question::new(2, 3, Operator::Addition), 100.0, 1.0);

        assert_eq!(submit_answer(&mut state, "5", 10.0), Ok(Resolution::Hit(id)));
        state.drain_events();
        run_until_lasers_done(&mut state);

        assert!(state.zombie(id).is_none());
        assert_eq!(state.score, 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.drain_events().contains(&GameEvent::ZombieDestroyed(id)));
    }

    #[test]
    fn test_stale_laser_finishes_without_scoring() {
        let mut state = running_state();
        let id = add_zombie(&mut state, Question::new(2, 3, Operator::Addition), 100.0, 1.0);
        submit_answer(&mut state, "5", 10.0).unwrap();

        state.remove_zombie(id);
        tick(&mut state, FRAME);
        assert!(state.lasers.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_target_lost_at_bottom_scores_nothing() {
        let mut state = running_state();
        let id = add_zombie(&mut state, Question::new(2, 3, Operator::Addition), 539.5, 1.0);
        // Fired from far away so it can't arrive this frame
        state.zombie_mut(id).unwrap().claimed = true;
        state.lasers.push(Laser::new(Vec2::new(0.0, 0.0), id));

        tick(&mut state, FRAME);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(state.lasers.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_phase_advances_every_ten_points() {
        let mut state = running_state();
        let mut phases = vec![state.phase];

        for n in 0..25 {
            let id = add_zombie(&mut state, Question::new(n, 1, Operator::Addition), 100.0, 0.0);
            state.zombie_mut(id).unwrap().claimed = true;
            // Already on top of the target centre
            let center = state.zombie(id).unwrap().center();
            state.lasers.push(Laser::new(center, id));
            tick(&mut state, FRAME);
            phases.push(state.phase);
        }

        assert_eq!(state.score, 25);
        assert_eq!(state.phase, 3);
        assert!(phases.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));
        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::PhaseAdvanced(_)))
                .count(),
            2
        );
    }

    #[test]
    fn test_phase_change_keeps_falling_zombies() {
        let mut state = running_state();
        state.score = 9;
        let old = add_zombie(&mut state, Question::new(1, 1, Operator::Addition), 10.0, 1.5);
        let target = add_zombie(&mut state, Question::new(2, 3, Operator::Addition), 100.0, 0.0);
        state.zombie_mut(target).unwrap().claimed = true;
        let center = state.zombie(target).unwrap().center();
        state.lasers.push(Laser::new(center, target));

        tick(&mut state, FRAME);
        assert_eq!(state.phase, 2);
        let old = state.zombie(old).unwrap();
        assert_eq!(old.speed, 1.5);
        assert_eq!(old.question, "1 + 1");
    }

    #[test]
    fn test_end_to_end_lowest_match_is_shot() {
        let mut state = running_state();
        let low = add_zombie(&mut state, Question::new(2, 3, Operator::Addition), 100.0, 1.0);
        let high = add_zombie(&mut state, Question::new(1, 4, Operator::Addition), 50.0, 1.0);

        assert_eq!(submit_answer(&mut state, "5", 10.0), Ok(Resolution::Hit(low)));
        assert!(!state.zombie(high).unwrap().claimed);
        run_until_lasers_done(&mut state);

        assert!(state.zombie(low).is_none());
        assert!(state.zombie(high).is_some());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_end_to_end_session_with_timer() {
        let mut state = running_state();
        let mut timer = SpawnTimer::default();
        let mut now = 0.0f64;

        // No answers: zombies pile through until every life is gone
        while state.is_running() && now < 600_000.0 {
            for _ in 0..timer.advance(FRAME as f64) {
                spawn_zombie(&mut state);
            }
            tick(&mut state, FRAME);
            now += FRAME as f64;
            if state.status == SessionStatus::GameOver {
                assert!(timer.cancel());
            }
        }

        assert_eq!(state.status, SessionStatus::GameOver);
        assert_eq!(state.lives, 0);
        let zombies_at_end = state.zombies.len();
        assert_eq!(timer.advance(10_000.0), 0);
        assert!(spawn_zombie(&mut state).is_none());
        assert_eq!(state.zombies.len(), zombies_at_end);
    }
}
