pub mod solver;
pub mod state;

pub use solver::{integrate_direct, resolve_swept, MAX_SPEED, MAX_SUBSTEPS, MAX_SUBSTEP_ENERGY};
pub use state::{Contacts, Motion, MotionState};
