pub mod instance;
pub mod surface;

pub use instance::RenderBuffer;
pub use surface::{LightDraw, SpriteDraw, Surface};
