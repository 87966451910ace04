//! Test support utilities for watchdog-core
//!
//! Provides MockEngine, an in-memory engine implementing both handle traits,
//! for testing the ContainerAdmin without a real Docker daemon.

use async_trait::async_trait;
use bollard::models::{ContainerConfig, ContainerInspectResponse, ContainerState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use watchdog_engine::*;

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    ListContainers { all: bool, name_filter: String },
    GetContainer { id: String },
    RemoveContainer { id: String, options: RemoveOptions },
    CreateVolume { config: VolumeConfig },
    GetVolume { name: String },
    RemoveVolume { name: String, force: bool },
    InspectContainer { id: String },
    InspectVolume { name: String },
}

/// Operations that can be made to fail with [`MockEngine::fail_next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    ListContainers,
    GetContainer,
    RemoveContainer,
    CreateVolume,
    GetVolume,
    RemoveVolume,
    InspectContainer,
    InspectVolume,
}

#[derive(Default)]
struct MockState {
    containers: Vec<ContainerRecord>,
    volumes: Vec<Volume>,
    calls: Vec<MockCall>,
    failures: HashMap<MockOp, EngineError>,
}

/// In-memory container engine.
///
/// Clones share state, so one mock can back both the object client and the
/// low-level API handle of a `ContainerAdmin`.
#[derive(Clone, Default)]
pub struct MockEngine {
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&self, container: ContainerRecord) {
        self.state.lock().unwrap().containers.push(container);
    }

    pub fn add_volume(&self, volume: Volume) {
        self.state.lock().unwrap().volumes.push(volume);
    }

    /// Make the next call of `op` fail with `err`
    pub fn fail_next(&self, op: MockOp, err: EngineError) {
        self.state.lock().unwrap().failures.insert(op, err);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.state.lock().unwrap().calls.contains(call)
    }

    /// Record a call and return the injected failure for it, if any
    fn record(&self, op: MockOp, call: MockCall) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn find_container(&self, id: &str) -> Result<ContainerRecord> {
        let wanted = id.trim_start_matches('/');
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.id.0 == id || c.name.trim_start_matches('/') == wanted)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("No such container: {}", id)))
    }

    fn find_volume(&self, name: &str) -> Result<Volume> {
        self.state
            .lock()
            .unwrap()
            .volumes
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("get {}: no such volume", name)))
    }
}

/// Approximates the engine's `name` filter: a trailing `*` is dropped and the
/// rest must occur in the container name.
fn matches_name_filter(name: &str, filter: &str) -> bool {
    name.trim_start_matches('/')
        .contains(filter.trim_end_matches('*'))
}

/// Create a mock container record; the id is derived from the name
pub fn mock_container(name: &str, image: &str, state: &str) -> ContainerRecord {
    ContainerRecord {
        id: ContainerId::new(format!("id-{}", name.trim_start_matches('/'))),
        name: name.to_string(),
        image: image.to_string(),
        state: state.to_string(),
        labels: HashMap::new(),
    }
}

/// Create a mock volume without driver options
pub fn mock_volume(name: &str, driver: &str) -> Volume {
    Volume {
        name: name.to_string(),
        driver: driver.to_string(),
        driver_opts: HashMap::new(),
        labels: HashMap::new(),
        mountpoint: format!("/var/lib/docker/volumes/{}/_data", name),
    }
}

#[async_trait]
impl ContainerEngine for MockEngine {
    async fn list_containers(&self, all: bool, name_filter: &str) -> Result<Vec<ContainerRecord>> {
        self.record(
            MockOp::ListContainers,
            MockCall::ListContainers {
                all,
                name_filter: name_filter.to_string(),
            },
        )?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .containers
            .iter()
            .filter(|c| all || c.state == "running")
            .filter(|c| matches_name_filter(&c.name, name_filter))
            .cloned()
            .collect())
    }

    async fn get_container(&self, id: &str) -> Result<ContainerRecord> {
        self.record(MockOp::GetContainer, MockCall::GetContainer { id: id.to_string() })?;
        self.find_container(id)
    }

    async fn remove_container(&self, id: &ContainerId, options: &RemoveOptions) -> Result<()> {
        self.record(
            MockOp::RemoveContainer,
            MockCall::RemoveContainer {
                id: id.0.clone(),
                options: *options,
            },
        )?;
        let container = self.find_container(&id.0)?;
        if container.state == "running" && !options.force {
            return Err(EngineError::Api {
                status_code: 409,
                message: format!("cannot remove running container {}", id),
            });
        }
        self.state
            .lock()
            .unwrap()
            .containers
            .retain(|c| c.id != container.id);
        Ok(())
    }

    async fn create_volume(&self, config: &VolumeConfig) -> Result<Volume> {
        self.record(
            MockOp::CreateVolume,
            MockCall::CreateVolume {
                config: config.clone(),
            },
        )?;
        if self.find_volume(&config.name).is_ok() {
            return Err(EngineError::Api {
                status_code: 409,
                message: format!("volume {} already exists", config.name),
            });
        }
        let volume = Volume {
            driver: config.driver.clone(),
            driver_opts: config.driver_opts.clone(),
            labels: config.labels.clone(),
            ..mock_volume(&config.name, &config.driver)
        };
        self.add_volume(volume.clone());
        Ok(volume)
    }

    async fn get_volume(&self, name: &str) -> Result<Volume> {
        self.record(MockOp::GetVolume, MockCall::GetVolume { name: name.to_string() })?;
        self.find_volume(name)
    }

    async fn remove_volume(&self, name: &str, force: bool) -> Result<()> {
        self.record(
            MockOp::RemoveVolume,
            MockCall::RemoveVolume {
                name: name.to_string(),
                force,
            },
        )?;
        self.find_volume(name)?;
        self.state.lock().unwrap().volumes.retain(|v| v.name != name);
        Ok(())
    }
}

#[async_trait]
impl EngineApi for MockEngine {
    async fn inspect_container(&self, id: &str) -> Result<ContainerInspectResponse> {
        self.record(
            MockOp::InspectContainer,
            MockCall::InspectContainer { id: id.to_string() },
        )?;
        let container = self.find_container(id)?;
        Ok(ContainerInspectResponse {
            id: Some(container.id.0.clone()),
            name: Some(container.name.clone()),
            state: Some(ContainerState {
                running: Some(container.state == "running"),
                ..Default::default()
            }),
            config: Some(ContainerConfig {
                image: Some(container.image.clone()),
                labels: Some(container.labels.clone()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    async fn inspect_volume(&self, name: &str) -> Result<Volume> {
        self.record(
            MockOp::InspectVolume,
            MockCall::InspectVolume {
                name: name.to_string(),
            },
        )?;
        self.find_volume(name)
    }
}
