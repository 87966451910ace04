//! Docker engine handle using bollard

use crate::{
    ContainerEngine, ContainerId, ContainerRecord, EngineApi, EngineError, RemoveOptions, Result,
    Volume, VolumeConfig,
};
use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, ListContainersOptions, RemoveContainerOptions};
use bollard::models::ContainerInspectResponse;
use bollard::volume::{CreateVolumeOptions, RemoveVolumeOptions};
use bollard::Docker;
use std::collections::HashMap;
use std::time::Duration;

/// Connection to a Docker-compatible engine
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect to the engine at `socket` and verify it responds.
    ///
    /// An empty `socket` uses the local defaults, honouring `DOCKER_HOST`.
    pub async fn new(socket: &str, timeout: u64) -> Result<Self> {
        let client = if socket.is_empty() {
            Docker::connect_with_local_defaults()
                .map_err(|e| EngineError::ConnectionError(e.to_string()))?
                .with_timeout(Duration::from_secs(timeout))
        } else if socket.starts_with("http://") || socket.starts_with("https://") {
            Docker::connect_with_http(socket, timeout, bollard::API_DEFAULT_VERSION)
                .map_err(|e| EngineError::ConnectionError(e.to_string()))?
        } else {
            let path = socket.trim_start_matches("unix://");
            Docker::connect_with_socket(path, timeout, bollard::API_DEFAULT_VERSION)
                .map_err(|e| EngineError::ConnectionError(e.to_string()))?
        };

        client
            .ping()
            .await
            .map_err(|e| EngineError::ConnectionError(e.to_string()))?;

        tracing::debug!(
            "Connected to container engine at {}",
            if socket.is_empty() { "local defaults" } else { socket }
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_containers(&self, all: bool, name_filter: &str) -> Result<Vec<ContainerRecord>> {
        let options = ListContainersOptions {
            all,
            filters: HashMap::from([("name".to_string(), vec![name_filter.to_string()])]),
            ..Default::default()
        };

        let summaries = self.client.list_containers(Some(options)).await?;

        // The list API reports the image ID once a tag moves; inspect each
        // container so the record carries its configured image.
        let mut records = Vec::with_capacity(summaries.len());
        for id in summaries.into_iter().filter_map(|c| c.id) {
            records.push(self.get_container(&id).await?);
        }
        Ok(records)
    }

    async fn get_container(&self, id: &str) -> Result<ContainerRecord> {
        let info = self
            .client
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        Ok(ContainerRecord::from(info))
    }

    async fn remove_container(&self, id: &ContainerId, options: &RemoveOptions) -> Result<()> {
        let options = RemoveContainerOptions {
            v: options.volumes,
            force: options.force,
            link: options.link,
        };
        self.client.remove_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn create_volume(&self, config: &VolumeConfig) -> Result<Volume> {
        let options = CreateVolumeOptions {
            name: config.name.clone(),
            driver: config.driver.clone(),
            driver_opts: config.driver_opts.clone(),
            labels: config.labels.clone(),
        };

        let volume = self.client.create_volume(options).await?;
        Ok(Volume::from(volume))
    }

    async fn get_volume(&self, name: &str) -> Result<Volume> {
        let volume = self.client.inspect_volume(name).await?;
        Ok(Volume::from(volume))
    }

    async fn remove_volume(&self, name: &str, force: bool) -> Result<()> {
        self.client
            .remove_volume(name, Some(RemoveVolumeOptions { force }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EngineApi for DockerEngine {
    async fn inspect_container(&self, id: &str) -> Result<ContainerInspectResponse> {
        Ok(self
            .client
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?)
    }

    async fn inspect_volume(&self, name: &str) -> Result<Volume> {
        let volume = self.client.inspect_volume(name).await?;
        Ok(Volume::from(volume))
    }
}
