//! CLI command implementations

mod containers;
mod manage;
mod volumes;

pub use containers::*;
pub use manage::*;
pub use volumes::*;
