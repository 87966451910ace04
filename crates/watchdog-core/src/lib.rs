//! Container admin client for the SKALE containers watchdog
//!
//! This crate provides:
//! - [`ContainerAdmin`], a facade over the container engine for listing,
//!   inspecting and removing containers and managing data volumes
//! - Name-based classification of core and workload containers
//! - The reduced [`ContainerSummary`] projection used for display

mod admin;
mod container;
mod error;

pub use admin::*;
pub use container::*;
pub use error::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
