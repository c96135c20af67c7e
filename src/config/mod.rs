pub mod toml_config;

pub use toml_config::DeployConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use crate::utils::error::Result;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "orion-deploy")]
#[command(about = "Deploys and wires the Orion contracts on an EVM network")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON-RPC endpoint, overrides network.rpc_url
    #[arg(long, env = "ORION_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Deployer private key, overrides network.private_key
    #[arg(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Hardhat artifacts directory, overrides artifacts.path
    #[arg(long)]
    pub artifacts: Option<String>,

    /// Directory to write the deployment report to
    #[arg(long)]
    pub report_dir: Option<String>,

    /// Resolve artifacts and print the plan without sending transactions
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 TOML (若有指定) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<DeployConfig> {
        let mut config = match &self.config {
            Some(path) => DeployConfig::from_file(path)?,
            None => DeployConfig::default(),
        };

        if let Some(rpc_url) = &self.rpc_url {
            config.network.rpc_url = rpc_url.clone();
        }
        if let Some(private_key) = &self.private_key {
            config.network.private_key = Some(private_key.clone());
        }
        if let Some(artifacts) = &self.artifacts {
            config.artifacts.path = artifacts.clone();
        }
        if let Some(report_dir) = &self.report_dir {
            config.output.report_dir = Some(report_dir.clone());
        }

        Ok(config)
    }
}
