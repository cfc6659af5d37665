pub mod descriptor;

pub use descriptor::{LevelDescriptor, LevelLibrary, Placement, SideMask};
