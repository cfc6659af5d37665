use glam::Vec2;

use super::surface::{LightDraw, SpriteDraw, Surface};

/// Default `Surface` sink: collects the tick's draw calls into flat,
/// Pod-backed buffers a host renderer can read out wholesale. Also the
/// sink the test suite renders into.
pub struct RenderBuffer {
    size: Vec2,
    scale: f32,
    pub sprites: Vec<SpriteDraw>,
    pub lights: Vec<LightDraw>,
}

impl RenderBuffer {
    pub fn new(size: Vec2, scale: f32) -> Self {
        Self {
            size,
            scale,
            sprites: Vec::with_capacity(512),
            lights: Vec::with_capacity(32),
        }
    }

    /// Clear collected draws; call before every rendered frame.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.lights.clear();
    }

    pub fn sprite_count(&self) -> u32 {
        self.sprites.len() as u32
    }

    pub fn light_count(&self) -> u32 {
        self.lights.len() as u32
    }

    /// Raw pointer to sprite data for shared-memory hosts.
    pub fn sprites_ptr(&self) -> *const f32 {
        self.sprites.as_ptr() as *const f32
    }

    /// Raw pointer to light data for shared-memory hosts.
    pub fn lights_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Surface for RenderBuffer {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn draw_sprite(&mut self, sprite: SpriteDraw) {
        self.sprites.push(sprite);
    }

    fn draw_light(&mut self, light: LightDraw) {
        self.lights.push(light);
    }
}
