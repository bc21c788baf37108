//! Headless surface that records draw calls
//!
//! Used by the native binary and by tests to run the full frame loop without
//! a display.

use glam::Vec2;

use super::{Sprite, Surface};
use crate::sim::Rect;

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Sprite { sprite: Sprite, rect: Rect },
    Rect { rect: Rect, color: String },
    Text { text: String, pos: Vec2, size_px: u32, color: String },
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    ready: [bool; 3],
    calls: Vec<DrawCall>,
    frames: u64,
}

impl HeadlessSurface {
    /// Surface where no sprite loaded
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all_sprites() -> Self {
        Self {
            ready: [true; 3],
            ..Self::default()
        }
    }

    pub fn set_ready(&mut self, sprite: Sprite, ready: bool) {
        self.ready[sprite.index()] = ready;
    }

    /// Calls since the last clear
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of clears seen (one per rendered gameplay frame)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprite_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Sprite { .. }))
            .count()
    }

    pub fn rects_of(&self, color: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Rect { color: fill, .. } if fill == color))
            .count()
    }
}

impl Surface for HeadlessSurface {
    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
        self.frames += 1;
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.ready[sprite.index()]
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.calls.push(DrawCall::Sprite { sprite, rect });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.calls.push(DrawCall::Rect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: u32, color: &str) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            pos,
            size_px,
            color: color.to_string(),
        });
    }
}
