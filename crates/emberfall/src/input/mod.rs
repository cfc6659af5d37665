pub mod snapshot;

pub use snapshot::{Action, InputSnapshot};
