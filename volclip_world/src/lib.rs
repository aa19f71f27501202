pub mod actor;
pub mod arena;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod journal;
pub mod level;
pub mod world;

pub use actor::*;
pub use arena::*;
pub use catalog::*;
pub use editor::*;
pub use error::*;
pub use journal::*;
pub use level::*;
pub use world::*;
