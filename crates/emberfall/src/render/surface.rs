use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One sprite draw call in screen space.
///
/// Plain floats plus two u32 flags so a buffer of these can be shared with
/// a GPU or foreign-host renderer without repacking (8 fields, 32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct SpriteDraw {
    /// Center position in surface pixels.
    pub x: f32,
    pub y: f32,
    /// Rendered size in surface pixels.
    pub w: f32,
    pub h: f32,
    /// Opaque asset token, passed through untouched.
    pub asset: u32,
    /// 1 = mirrored horizontally.
    pub flip_x: u32,
    pub _pad: [u32; 2],
}

impl SpriteDraw {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// One light-mask draw call in screen space.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct LightDraw {
    /// Center position in surface pixels.
    pub x: f32,
    pub y: f32,
    /// Radius in surface pixels.
    pub radius: f32,
    /// 1 when this light also soothes the danger meter; the mask renderer
    /// splits on it, the simulation does not.
    pub soothes: u32,
}

impl LightDraw {
    pub const FLOATS: usize = 4;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// A caller-owned drawable surface. The world reads its own state and emits
/// draw calls; it never owns or inspects the render target.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> Vec2;
    /// World-unit → pixel scale factor.
    fn scale(&self) -> f32;
    fn draw_sprite(&mut self, sprite: SpriteDraw);
    fn draw_light(&mut self, light: LightDraw);
}
