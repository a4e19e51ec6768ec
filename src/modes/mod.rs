pub mod play;

pub use play::{BoxedStore, PlayMode};
