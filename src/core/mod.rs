pub mod contracts;
pub mod factory;
pub mod orchestrator;
pub mod upgrades;

pub use crate::domain::model::{DeploymentReport, ProxyDeployment, ProxyKind};
pub use crate::domain::ports::{ArtifactSource, ChainClient, Storage};
pub use crate::utils::error::Result;
