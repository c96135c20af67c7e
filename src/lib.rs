pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{AlloyChainClient, HardhatArtifacts, LocalStorage};
pub use crate::config::DeployConfig;
pub use crate::core::{
    factory::ContractFactory, orchestrator::DeploymentOrchestrator, upgrades::Upgrades,
};
pub use crate::utils::error::{DeployError, Result};
