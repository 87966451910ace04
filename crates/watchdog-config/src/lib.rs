//! Configuration for the SKALE containers watchdog
//!
//! Settings live in `~/.config/watchdog/config.toml`; a missing file means
//! defaults. Docker registry credentials may also come from the
//! `DOCKER_USERNAME` / `DOCKER_PASSWORD` environment variables.

mod error;
mod global;

pub use error::*;
pub use global::*;
