pub mod overlap;
pub mod shape;
pub mod sweep;

pub use overlap::hit_test;
pub use shape::{Hitbox, EPSILON};
pub use sweep::{hit_contact, hit_distance, HitSide, SweptContact};
