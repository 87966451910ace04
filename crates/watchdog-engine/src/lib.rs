//! Container engine handles for the watchdog
//!
//! The engine is reached through two independent handles: a high-level
//! object client ([`ContainerEngine`]) for listing, fetching, creating and
//! removing resources, and a low-level API client ([`EngineApi`]) for raw
//! inspection. [`DockerEngine`] implements both over bollard.

mod docker;
mod error;
mod types;

pub use docker::DockerEngine;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use bollard::models::ContainerInspectResponse;

/// High-level object access to containers and volumes
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// List containers whose name matches the engine-side `name` filter.
    ///
    /// Records carry the same fields as [`ContainerEngine::get_container`],
    /// so `image` is the configured image reference rather than the image ID.
    async fn list_containers(&self, all: bool, name_filter: &str) -> Result<Vec<ContainerRecord>>;

    /// Fetch a container by id or name
    async fn get_container(&self, id: &str) -> Result<ContainerRecord>;

    /// Remove a container
    async fn remove_container(&self, id: &ContainerId, options: &RemoveOptions) -> Result<()>;

    /// Create a named volume
    async fn create_volume(&self, config: &VolumeConfig) -> Result<Volume>;

    /// Fetch a volume by name
    async fn get_volume(&self, name: &str) -> Result<Volume>;

    /// Remove a volume
    async fn remove_volume(&self, name: &str, force: bool) -> Result<()>;
}

/// Low-level raw API access
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// Raw container inspection as returned by the engine
    async fn inspect_container(&self, id: &str) -> Result<ContainerInspectResponse>;

    /// Raw volume inspection
    async fn inspect_volume(&self, name: &str) -> Result<Volume>;
}
