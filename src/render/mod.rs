//! Rendering module
//!
//! The game draws through the [`Surface`] trait: clear, image-at-rect,
//! rotated image and text. Each frame issues the same call sequence for the
//! same state, so the browser canvas and tests see identical output.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::consts::*;
use crate::sim::GameState;

/// Images the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Cannon,
    Zombie,
    Laser,
    Life,
}

impl Sprite {
    pub const ALL: [Sprite; 4] = [Sprite::Cannon, Sprite::Zombie, Sprite::Laser, Sprite::Life];

    /// Asset path relative to the page
    pub fn path(&self) -> &'static str {
        match self {
            Sprite::Cannon => "assets/cannon.png",
            Sprite::Zombie => "assets/zombie.png",
            Sprite::Laser => "assets/laser.png",
            Sprite::Life => "assets/life.png",
        }
    }
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub color: &'static str,
}

/// Question labels above zombies
pub const QUESTION_STYLE: TextStyle = TextStyle {
    font: "16px Arial",
    color: "white",
};

/// Drawing target for one frame
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
    /// Draw `sprite` of `size` centred on `center`, rotated by `angle` radians
    fn draw_sprite_rotated(&mut self, sprite: Sprite, center: Vec2, size: Vec2, angle: f32);
    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);
}

/// Where the cannon sprite sits
pub fn cannon_rect(state: &GameState) -> Rect {
    let arena = state.arena;
    Rect::new(
        arena.width / 2.0 - CANNON_WIDTH / 2.0,
        arena.height - CANNON_HEIGHT,
        CANNON_WIDTH,
        CANNON_HEIGHT,
    )
}

/// Draw the whole scene: background clear, cannon, zombies with their
/// questions, then lasers pointing at their targets.
pub fn render_frame(state: &GameState, surface: &mut impl Surface) {
    surface.clear(state.arena.width, state.arena.height);
    surface.draw_sprite(Sprite::Cannon, cannon_rect(state));

    for zombie in &state.zombies {
        surface.draw_sprite(
            Sprite::Zombie,
            Rect {
                pos: zombie.pos,
                size: zombie.size,
            },
        );
        surface.draw_text(
            &zombie.question,
            Vec2::new(zombie.pos.x, zombie.pos.y - 5.0),
            &QUESTION_STYLE,
        );
    }

    for laser in &state.lasers {
        // A laser whose target is gone is about to be dropped; skip it
        let Some(target) = state.zombie(laser.target) else {
            continue;
        };
        let angle = laser.heading(target.center());
        surface.draw_sprite_rotated(
            Sprite::Laser,
            laser.pos,
            Vec2::new(LASER_WIDTH, LASER_HEIGHT),
            angle,
        );
    }
}

/// Display strings for the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score_text: String,
    pub phase_text: String,
    /// Number of life icons to show
    pub life_icons: u32,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score_text: format!("Score: {}", state.score),
            phase_text: format!("Phase: {}", state.phase),
            life_icons: state.lives,
        }
    }
}
