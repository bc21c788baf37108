//! 2D rendering module
//!
//! Draws the game through the [`Surface`] trait so the same frame code runs
//! on the browser canvas and on the headless recorder. Any sprite that is not
//! ready is replaced by a flat rectangle.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use headless::{DrawCall, HeadlessSurface};

use glam::Vec2;

use crate::assets::AssetId;
use crate::consts::FONT_FAMILY;
use crate::sim::{GameState, Rect};

/// Fallback colours, used when a sprite failed to load
pub mod colors {
    pub const BACKGROUND: &str = "#ccc";
    pub const VEHICLE: &str = "blue";
    pub const OBSTACLE: &str = "red";

    pub const SCORE: &str = "gray";
    pub const HIGH_SCORE: &str = "green";
    pub const GAME_OVER: &str = "red";
    pub const RESTART_HINT: &str = "blue";
}

/// HUD text sizes (px)
const HUD_TEXT_PX: u32 = 24;
const TITLE_TEXT_PX: u32 = 30;

/// Images the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Vehicle,
    Obstacle,
    Background,
}

impl Sprite {
    pub const ALL: [Sprite; 3] = [Sprite::Vehicle, Sprite::Obstacle, Sprite::Background];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Sprite::Vehicle => 0,
            Sprite::Obstacle => 1,
            Sprite::Background => 2,
        }
    }

    pub fn asset(self) -> AssetId {
        match self {
            Sprite::Vehicle => AssetId::CarImage,
            Sprite::Obstacle => AssetId::ObstacleImage,
            Sprite::Background => AssetId::BackgroundImage,
        }
    }
}

/// A fixed-size 2D drawing context
pub trait Surface {
    fn clear(&mut self);
    /// Sprite is decoded and drawable
    fn sprite_ready(&self, sprite: Sprite) -> bool;
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// Draw text with its baseline starting at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: u32, color: &str);
}

/// Draw a sprite, or a flat rectangle if it is not available
fn sprite_or_fallback(surface: &mut dyn Surface, sprite: Sprite, rect: Rect, fallback: &str) {
    if surface.sprite_ready(sprite) {
        surface.draw_sprite(sprite, rect);
    } else {
        surface.fill_rect(rect, fallback);
    }
}

/// CSS font for HUD text, falling back to sans-serif while the display font loads
pub fn font_css(size_px: u32) -> String {
    format!("{}px '{}', sans-serif", size_px, FONT_FAMILY)
}

pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}

pub fn high_score_text(best: u32) -> String {
    format!("Highscore: {}", best)
}

/// Render one frame of a run in progress
pub fn render_playing(state: &GameState, show_hud: bool, surface: &mut dyn Surface) {
    let tuning = &state.tuning;
    surface.clear();

    // Background: two tiles side by side, scrolled left
    if surface.sprite_ready(Sprite::Background) {
        for offset in [0.0, tuning.screen_width] {
            let rect = Rect::new(
                state.background_x + offset,
                0.0,
                tuning.screen_width,
                tuning.screen_height,
            );
            surface.draw_sprite(Sprite::Background, rect);
        }
    } else {
        let rect = Rect::new(0.0, 0.0, tuning.screen_width, tuning.screen_height);
        surface.fill_rect(rect, colors::BACKGROUND);
    }

    sprite_or_fallback(
        surface,
        Sprite::Vehicle,
        state.vehicle.rect(tuning),
        colors::VEHICLE,
    );
    for obstacle in &state.obstacles {
        sprite_or_fallback(
            surface,
            Sprite::Obstacle,
            obstacle.rect(tuning),
            colors::OBSTACLE,
        );
    }

    if show_hud {
        surface.fill_text(
            &score_text(state.score),
            Vec2::new(10.0, 30.0),
            HUD_TEXT_PX,
            colors::SCORE,
        );
        surface.fill_text(
            &high_score_text(state.high_score.best()),
            Vec2::new(10.0, 60.0),
            HUD_TEXT_PX,
            colors::HIGH_SCORE,
        );
    }
}

/// Render the terminal screen over whatever the last frame left behind
pub fn render_game_over(state: &GameState, surface: &mut dyn Surface) {
    let lines: [(String, f32, u32, &str); 4] = [
        ("Game Over!".to_string(), 180.0, TITLE_TEXT_PX, colors::GAME_OVER),
        (score_text(state.score), 220.0, HUD_TEXT_PX, colors::SCORE),
        (
            high_score_text(state.high_score.best()),
            260.0,
            HUD_TEXT_PX,
            colors::HIGH_SCORE,
        ),
        (
            "Press ↑ or ↓ to restart".to_string(),
            300.0,
            HUD_TEXT_PX,
            colors::RESTART_HINT,
        ),
    ];
    for (text, y, size, color) in &lines {
        surface.fill_text(text, Vec2::new(250.0, *y), *size, color);
    }
}
