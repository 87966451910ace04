//! Container admin client - a facade over the container engine

use crate::{is_core_container, summarize, ContainerFilter, ContainerInfo, ContainerSummary};
use crate::{CoreError, Result};
use bollard::auth::DockerCredentials;
use std::collections::HashMap;
use watchdog_config::{ContainersConfig, GlobalConfig};
use watchdog_engine::{
    ContainerEngine, ContainerId, ContainerRecord, DockerEngine, EngineApi, EngineError,
    RemoveOptions, Volume, VolumeConfig,
};

/// Volume driver backed by a plain directory on the host
pub const LOCAL_VOLUME_DRIVER: &str = "local";

/// Lists, inspects and removes SKALE containers and manages data volumes.
///
/// Holds two engine handles: `client` for object-level access and `api`
/// for raw inspection.
pub struct ContainerAdmin {
    client: Box<dyn ContainerEngine>,
    api: Box<dyn EngineApi>,
    volume_driver: String,
    statuses: ContainersConfig,
    username: Option<String>,
    password: Option<String>,
}

impl ContainerAdmin {
    /// Connect both engine handles using the global configuration
    pub async fn connect(config: &GlobalConfig) -> Result<Self> {
        config.validate()?;
        let docker = &config.docker;
        let client = DockerEngine::new(&docker.socket, docker.timeout).await?;
        let api = DockerEngine::new(&docker.socket, docker.timeout).await?;
        Ok(Self::with_handles(Box::new(client), Box::new(api), config))
    }

    /// Build an admin client from already connected handles
    pub fn with_handles(
        client: Box<dyn ContainerEngine>,
        api: Box<dyn EngineApi>,
        config: &GlobalConfig,
    ) -> Self {
        let docker = &config.docker;
        tracing::debug!(
            "Container admin ready: volume_driver={}, registry credentials configured: {}",
            docker.volume_driver,
            docker.has_credentials()
        );
        Self {
            client,
            api,
            volume_driver: docker.volume_driver.clone(),
            statuses: config.containers.clone(),
            username: docker.username.clone(),
            password: docker.password.clone(),
        }
    }

    /// Configured registry credentials, passed through unchanged
    pub fn registry_credentials(&self) -> Option<DockerCredentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(DockerCredentials {
                username: Some(username.clone()),
                password: Some(password.clone()),
                ..Default::default()
            }),
            _ => None,
        }
    }

    // ==================== Volumes ====================

    /// Check whether a volume exists; any failure other than not-found is returned
    pub async fn volume_exists(&self, name: &str) -> Result<bool> {
        match self.api.inspect_volume(name).await {
            Ok(_) => Ok(true),
            Err(EngineError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Volume creation request for `name`.
    ///
    /// Only non-local drivers receive a `size` option, and only for a non-zero size.
    pub fn volume_config(&self, name: &str, size: Option<u64>) -> VolumeConfig {
        let mut driver_opts = HashMap::new();
        if self.volume_driver != LOCAL_VOLUME_DRIVER {
            if let Some(size) = size.filter(|s| *s > 0) {
                driver_opts.insert("size".to_string(), size.to_string());
            }
        }

        VolumeConfig {
            name: name.to_string(),
            driver: self.volume_driver.clone(),
            driver_opts,
            labels: HashMap::from([("schain".to_string(), name.to_string())]),
        }
    }

    /// Create a data volume labelled with its sChain name
    pub async fn create_volume(&self, name: &str, size: Option<u64>) -> Result<Volume> {
        if name.is_empty() {
            return Err(CoreError::InvalidArgument(
                "volume name must not be empty".to_string(),
            ));
        }

        let config = self.volume_config(name, size);
        tracing::info!(
            "Creating volume - size: {:?}, name: {}, driver_opts: {:?}",
            size,
            name,
            config.driver_opts
        );

        Ok(self.client.create_volume(&config).await?)
    }

    /// Force-remove a volume. A missing volume is an error.
    pub async fn remove_volume(&self, name: &str) -> Result<()> {
        let volume = self.client.get_volume(name).await?;
        tracing::warn!("Going to remove volume {}", volume.name);
        self.client.remove_volume(&volume.name, true).await?;
        Ok(())
    }

    // ==================== Containers ====================

    /// List containers of a group in engine order
    pub async fn list_containers(
        &self,
        filter: ContainerFilter,
        all: bool,
    ) -> Result<Vec<ContainerRecord>> {
        let containers = self
            .client
            .list_containers(all, filter.name_pattern())
            .await?;

        Ok(match filter {
            ContainerFilter::Core => containers.into_iter().filter(is_core_container).collect(),
            ContainerFilter::Skale | ContainerFilter::Schain => containers,
        })
    }

    /// List containers of a group as display summaries
    pub async fn list_container_summaries(
        &self,
        filter: ContainerFilter,
        all: bool,
    ) -> Result<Vec<ContainerSummary>> {
        let containers = self.list_containers(filter, all).await?;
        Ok(summarize(&containers))
    }

    /// All `skale_*` containers
    pub async fn skale_containers(&self, all: bool) -> Result<Vec<ContainerRecord>> {
        self.list_containers(ContainerFilter::Skale, all).await
    }

    /// All `skale_schain_*` containers
    pub async fn schain_containers(&self, all: bool) -> Result<Vec<ContainerRecord>> {
        self.list_containers(ContainerFilter::Schain, all).await
    }

    /// `skale_*` containers that are not sChain or IMA workloads
    pub async fn core_containers(&self, all: bool) -> Result<Vec<ContainerRecord>> {
        self.list_containers(ContainerFilter::Core, all).await
    }

    /// Status and inspection data for one container.
    ///
    /// A missing container yields the not-found sentinel status instead of an error.
    pub async fn container_info(&self, id: &str) -> Result<ContainerInfo> {
        let lookup = async {
            let container = self.client.get_container(id).await?;
            let stats = self.api.inspect_container(&container.id.0).await?;
            Ok::<_, EngineError>(ContainerInfo {
                status: container.state,
                stats: Some(stats),
            })
        };

        match lookup.await {
            Ok(info) => Ok(info),
            Err(EngineError::NotFound(_)) => {
                tracing::warn!("Can not get info - no such container: {}", id);
                Ok(ContainerInfo::not_found(&self.statuses.not_found_status))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_running(&self, info: &ContainerInfo) -> bool {
        info.status == self.statuses.running_status
    }

    /// A container that does not exist has to be created and started
    pub fn needs_start(&self, info: &ContainerInfo) -> bool {
        info.status == self.statuses.not_found_status
    }

    /// Remove a container, logging instead of failing on engine errors.
    ///
    /// Returns the removed container's id, or `None` if the engine rejected
    /// the lookup or the removal. Failures to reach the engine are returned.
    pub async fn safe_remove_container(
        &self,
        name: &str,
        options: RemoveOptions,
    ) -> Result<Option<ContainerId>> {
        tracing::info!("Removing container: {}", name);

        let removal = async {
            let container = self.client.get_container(name).await?;
            self.client.remove_container(&container.id, &options).await?;
            Ok::<_, EngineError>(container.id)
        };

        match removal.await {
            Ok(id) => {
                tracing::info!("Container removed: {}", name);
                Ok(Some(id))
            }
            Err(e) if e.is_api_error() => {
                tracing::error!("Could not remove container {}: {}", name, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn test_admin(engine: &MockEngine) -> ContainerAdmin {
        admin_with_driver(engine, "lvmpy")
    }

    fn admin_with_driver(engine: &MockEngine, driver: &str) -> ContainerAdmin {
        let mut config = GlobalConfig::default();
        config.docker.volume_driver = driver.to_string();
        ContainerAdmin::with_handles(
            Box::new(engine.clone()),
            Box::new(engine.clone()),
            &config,
        )
    }

    fn seeded_engine() -> MockEngine {
        let engine = MockEngine::new();
        for (name, image, state) in [
            ("/skale_admin", "skalenetwork/admin:2.1", "running"),
            ("/skale_schain_alpha", "skalenetwork/schain:3.0", "running"),
            ("/skale_ima_alpha", "skalenetwork/ima:2.0", "exited"),
            ("/skale_api", "skalenetwork/admin:2.1", "exited"),
            ("/postgres", "postgres:15", "running"),
        ] {
            engine.add_container(mock_container(name, image, state));
        }
        engine
    }

    // ==================== Volumes ====================

    #[tokio::test]
    async fn test_volume_exists() {
        let engine = MockEngine::new();
        engine.add_volume(mock_volume("present", "lvmpy"));
        let admin = test_admin(&engine);

        assert!(admin.volume_exists("present").await.unwrap());
        assert!(!admin.volume_exists("absent").await.unwrap());
        assert!(engine.was_called(&MockCall::InspectVolume {
            name: "absent".to_string()
        }));
    }

    #[tokio::test]
    async fn test_volume_exists_propagates_other_errors() {
        let engine = MockEngine::new();
        engine.fail_next(
            MockOp::InspectVolume,
            EngineError::Api {
                status_code: 500,
                message: "daemon exploded".to_string(),
            },
        );
        let admin = test_admin(&engine);

        let err = admin.volume_exists("v1").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Engine(EngineError::Api { status_code: 500, .. })
        ));
    }

    #[test]
    fn test_volume_config_with_size() {
        let engine = MockEngine::new();
        let config = test_admin(&engine).volume_config("v1", Some(10));
        assert_eq!(config.driver, "lvmpy");
        assert_eq!(
            config.driver_opts,
            HashMap::from([("size".to_string(), "10".to_string())])
        );
        assert_eq!(config.labels.get("schain").map(String::as_str), Some("v1"));
    }

    #[test]
    fn test_volume_config_without_size_options() {
        let engine = MockEngine::new();
        assert!(test_admin(&engine)
            .volume_config("v1", None)
            .driver_opts
            .is_empty());
        assert!(test_admin(&engine)
            .volume_config("v1", Some(0))
            .driver_opts
            .is_empty());
        assert!(admin_with_driver(&engine, "local")
            .volume_config("v1", Some(10))
            .driver_opts
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_volume_rejects_empty_name() {
        let engine = MockEngine::new();
        let admin = test_admin(&engine);

        let err = admin.create_volume("", Some(10)).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
        assert!(engine.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_volume_fails() {
        let engine = MockEngine::new();
        engine.add_volume(mock_volume("v1", "lvmpy"));
        let admin = test_admin(&engine);

        let err = admin.create_volume("v1", Some(10)).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Engine(EngineError::Api { status_code: 409, .. })
        ));
    }

    #[tokio::test]
    async fn test_volume_lifecycle() {
        let engine = MockEngine::new();
        let admin = test_admin(&engine);

        let volume = admin.create_volume("v1", Some(10)).await.unwrap();
        assert_eq!(volume.driver, "lvmpy");

        let inspected = engine.inspect_volume("v1").await.unwrap();
        assert_eq!(
            inspected.driver_opts,
            HashMap::from([("size".to_string(), "10".to_string())])
        );
        assert!(admin.volume_exists("v1").await.unwrap());

        admin.remove_volume("v1").await.unwrap();
        assert!(!admin.volume_exists("v1").await.unwrap());
        assert!(engine.was_called(&MockCall::RemoveVolume {
            name: "v1".to_string(),
            force: true,
        }));
    }

    #[tokio::test]
    async fn test_remove_missing_volume_propagates_not_found() {
        let engine = MockEngine::new();
        let admin = test_admin(&engine);

        let err = admin.remove_volume("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!engine.was_called(&MockCall::RemoveVolume {
            name: "ghost".to_string(),
            force: true,
        }));
    }

    // ==================== Listing ====================

    #[tokio::test]
    async fn test_list_skale_containers() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let running = admin.skale_containers(false).await.unwrap();
        let names: Vec<_> = running.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["/skale_admin", "/skale_schain_alpha"]);

        let all = admin.skale_containers(true).await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(engine.was_called(&MockCall::ListContainers {
            all: true,
            name_filter: "skale_*".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_list_schain_containers() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let schains = admin.schain_containers(true).await.unwrap();
        assert_eq!(schains.len(), 1);
        assert_eq!(schains[0].name, "/skale_schain_alpha");
        assert!(engine.was_called(&MockCall::ListContainers {
            all: true,
            name_filter: "skale_schain_*".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_list_core_containers() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let core = admin.core_containers(true).await.unwrap();
        let names: Vec<_> = core.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["/skale_admin", "/skale_api"]);
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let summaries = admin
            .list_container_summaries(ContainerFilter::Core, false)
            .await
            .unwrap();
        assert_eq!(
            summaries,
            vec![ContainerSummary {
                image: "skalenetwork/admin:2.1".to_string(),
                name: "skale_admin".to_string(),
                state: "running".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_propagates_engine_errors() {
        let engine = seeded_engine();
        engine.fail_next(
            MockOp::ListContainers,
            EngineError::Transport("connection reset".to_string()),
        );
        let admin = test_admin(&engine);

        assert!(admin.skale_containers(false).await.is_err());
    }

    // ==================== Status ====================

    #[tokio::test]
    async fn test_container_info_running() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let info = admin.container_info("skale_admin").await.unwrap();
        assert_eq!(info.status, "running");
        let stats = info.stats.as_ref().unwrap();
        assert_eq!(stats.name.as_deref(), Some("/skale_admin"));
        assert!(admin.is_running(&info));
        assert!(!admin.needs_start(&info));
        assert!(engine.was_called(&MockCall::InspectContainer {
            id: "id-skale_admin".to_string()
        }));
    }

    #[tokio::test]
    async fn test_container_info_not_found() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let info = admin.container_info("skale_schain_missing").await.unwrap();
        assert_eq!(info.status, "not_found");
        assert!(info.stats.is_none());
        assert!(admin.needs_start(&info));
        assert!(!admin.is_running(&info));
    }

    #[tokio::test]
    async fn test_container_info_removed_before_inspect() {
        let engine = seeded_engine();
        engine.fail_next(
            MockOp::InspectContainer,
            EngineError::NotFound("No such container: id-skale_admin".to_string()),
        );
        let admin = test_admin(&engine);

        let info = admin.container_info("skale_admin").await.unwrap();
        assert!(engine.was_called(&MockCall::GetContainer {
            id: "skale_admin".to_string()
        }));
        assert_eq!(info.status, "not_found");
        assert!(info.stats.is_none());
        assert!(admin.needs_start(&info));
        assert!(!admin.is_running(&info));
    }

    #[tokio::test]
    async fn test_container_info_exited() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let info = admin.container_info("skale_api").await.unwrap();
        assert_eq!(info.status, "exited");
        assert!(!admin.is_running(&info));
        assert!(!admin.needs_start(&info));
    }

    #[tokio::test]
    async fn test_container_info_propagates_other_errors() {
        let engine = seeded_engine();
        engine.fail_next(
            MockOp::GetContainer,
            EngineError::Api {
                status_code: 500,
                message: "internal".to_string(),
            },
        );
        let admin = test_admin(&engine);

        assert!(admin.container_info("skale_admin").await.is_err());
    }

    #[test]
    fn test_status_predicates_use_configured_constants() {
        let engine = MockEngine::new();
        let mut config = GlobalConfig::default();
        config.containers.running_status = "up".to_string();
        config.containers.not_found_status = "gone".to_string();
        let admin =
            ContainerAdmin::with_handles(Box::new(engine.clone()), Box::new(engine), &config);

        let up = ContainerInfo { status: "up".to_string(), stats: None };
        assert!(admin.is_running(&up));
        assert!(admin.needs_start(&ContainerInfo::not_found("gone")));
        assert!(!admin.is_running(&ContainerInfo::not_found("gone")));
    }

    // ==================== Removal ====================

    #[tokio::test]
    async fn test_safe_remove_container() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);
        let options = RemoveOptions {
            force: true,
            volumes: true,
            ..Default::default()
        };

        let removed = admin.safe_remove_container("skale_api", options).await.unwrap();
        assert_eq!(removed, Some(ContainerId::new("id-skale_api")));
        assert!(engine.was_called(&MockCall::RemoveContainer {
            id: "id-skale_api".to_string(),
            options,
        }));
        assert_eq!(admin.skale_containers(true).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_safe_remove_missing_container() {
        let engine = seeded_engine();
        let admin = test_admin(&engine);

        let removed = admin
            .safe_remove_container("skale_ghost", RemoveOptions::default())
            .await
            .unwrap();
        assert_eq!(removed, None);
    }

    #[tokio::test]
    async fn test_safe_remove_swallows_api_errors() {
        let engine = seeded_engine();
        engine.fail_next(
            MockOp::RemoveContainer,
            EngineError::Api {
                status_code: 409,
                message: "container is running".to_string(),
            },
        );
        let admin = test_admin(&engine);

        let removed = admin
            .safe_remove_container("skale_admin", RemoveOptions::default())
            .await
            .unwrap();
        assert_eq!(removed, None);
    }

    #[tokio::test]
    async fn test_safe_remove_propagates_transport_errors() {
        let engine = seeded_engine();
        engine.fail_next(
            MockOp::GetContainer,
            EngineError::Transport("broken pipe".to_string()),
        );
        let admin = test_admin(&engine);

        assert!(admin
            .safe_remove_container("skale_admin", RemoveOptions::default())
            .await
            .is_err());
    }

    // ==================== Credentials ====================

    #[test]
    fn test_registry_credentials_pass_through() {
        let engine = MockEngine::new();
        let mut config = GlobalConfig::default();
        config.docker.username = Some("skale".to_string());
        config.docker.password = Some("secret".to_string());
        let admin =
            ContainerAdmin::with_handles(Box::new(engine.clone()), Box::new(engine), &config);

        let creds = admin.registry_credentials().unwrap();
        assert_eq!(creds.username.as_deref(), Some("skale"));
        assert_eq!(creds.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_no_credentials_without_password() {
        let engine = MockEngine::new();
        let mut config = GlobalConfig::default();
        config.docker.username = Some("skale".to_string());
        let admin =
            ContainerAdmin::with_handles(Box::new(engine.clone()), Box::new(engine), &config);
        assert!(admin.registry_credentials().is_none());
    }
}
