//! Copy selected volumes out of a world as a JSON snapshot and paste them
//! back, possibly into another world.

pub mod error;
pub mod extract;
pub mod geometry;
pub mod paste;
pub mod resolver;
pub mod transport;

pub use error::*;
pub use extract::*;
pub use geometry::*;
pub use paste::*;
pub use resolver::*;
pub use transport::*;
