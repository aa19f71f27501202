pub mod error;
pub mod record;
pub mod wire;

pub use error::*;
pub use record::*;
pub use wire::*;
