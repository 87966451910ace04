//! Container naming conventions, classification and display projection

use bollard::models::ContainerInspectResponse;
use serde::Serialize;
use watchdog_engine::ContainerRecord;

/// Engine name filter matching every SKALE container
pub const SKALE_NAME_PATTERN: &str = "skale_*";

/// Engine name filter matching sChain containers
pub const SCHAIN_NAME_PATTERN: &str = "skale_schain_*";

/// Raw-name prefixes of workload containers, which are never "core"
const WORKLOAD_PREFIXES: [&str; 2] = ["/skale_schain", "/skale_ima"];

/// Which group of SKALE containers to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerFilter {
    /// Every container named `skale_*`
    #[default]
    Skale,
    /// sChain containers (`skale_schain_*`)
    Schain,
    /// `skale_*` containers that are not sChain or IMA workloads
    Core,
}

impl ContainerFilter {
    /// The name filter passed to the engine
    pub fn name_pattern(&self) -> &'static str {
        match self {
            Self::Skale | Self::Core => SKALE_NAME_PATTERN,
            Self::Schain => SCHAIN_NAME_PATTERN,
        }
    }
}

impl std::fmt::Display for ContainerFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skale => write!(f, "skale"),
            Self::Schain => write!(f, "schain"),
            Self::Core => write!(f, "core"),
        }
    }
}

impl std::str::FromStr for ContainerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skale" => Ok(Self::Skale),
            "schain" => Ok(Self::Schain),
            "core" => Ok(Self::Core),
            _ => Err(format!("Unknown container filter: {}", s)),
        }
    }
}

/// Whether a container belongs to node infrastructure rather than a workload.
///
/// Works on the raw engine name, which carries a leading `/`.
pub fn is_core_container(container: &ContainerRecord) -> bool {
    !WORKLOAD_PREFIXES
        .iter()
        .any(|prefix| container.name.starts_with(prefix))
}

/// Reduced, display-oriented view of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub image: String,
    pub name: String,
    pub state: String,
}

impl From<&ContainerRecord> for ContainerSummary {
    fn from(container: &ContainerRecord) -> Self {
        Self {
            image: container.image.clone(),
            name: container
                .name
                .strip_prefix('/')
                .unwrap_or(&container.name)
                .to_string(),
            state: container.state.clone(),
        }
    }
}

/// Project raw records into summaries, keeping engine order
pub fn summarize(containers: &[ContainerRecord]) -> Vec<ContainerSummary> {
    containers.iter().map(ContainerSummary::from).collect()
}

/// Result of a single-container status query
#[derive(Debug, Clone, Serialize)]
pub struct ContainerInfo {
    /// Engine state, or the configured not-found sentinel
    pub status: String,
    /// Raw inspection data; absent when the container was not found
    pub stats: Option<ContainerInspectResponse>,
}

impl ContainerInfo {
    pub fn not_found(sentinel: &str) -> Self {
        Self {
            status: sentinel.to_string(),
            stats: None,
        }
    }
}
