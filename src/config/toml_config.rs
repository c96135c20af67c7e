use crate::domain::model::ProxyKind;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use alloy::primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Trader Joe router, Avalanche C-Chain
pub const JOE_ROUTER_ADDRESS: Address = address!("60ae616a2155ee3d9a68541ba4544862310933d4");
/// MIM 穩定幣
pub const MIM_ADDRESS: Address = address!("130966628846bfd36ff31a822705796e8cb8c18d");
/// 10^25
pub const DEFAULT_SWAP_THRESHOLD: &str = "10000000000000000000000000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub network: NetworkConfig,
    pub artifacts: ArtifactsConfig,
    pub contracts: ContractsConfig,
    pub proxy: ProxyConfig,
    pub liquidity: LiquidityConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub chain_id: Option<u64>,
    pub confirmations: u64,
    pub receipt_timeout_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            private_key: None,
            chain_id: None,
            confirmations: 1,
            receipt_timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub path: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            path: "./artifacts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    pub manager: String,
    pub token: String,
    pub wallet_observer: String,
    pub liquidity_pool_manager: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            manager: "OrionsManagerUpgradeable".to_string(),
            token: "OrionProtocol".to_string(),
            wallet_observer: "WalletObserverUpgradeable".to_string(),
            liquidity_pool_manager: "LiquidityPoolManager".to_string(),
        }
    }
}

/// proxy 合約 (ProxyAdmin、TransparentUpgradeableProxy、ERC1967Proxy) 不內建，
/// 需在專案中 import OpenZeppelin 的合約並編譯，artifact 才會出現在 `artifacts.path`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub kind: ProxyKind,
    pub initializer: String,
    pub admin_contract: String,
    pub transparent_contract: String,
    pub erc1967_contract: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            kind: ProxyKind::Transparent,
            initializer: "initialize".to_string(),
            admin_contract: "ProxyAdmin".to_string(),
            transparent_contract: "TransparentUpgradeableProxy".to_string(),
            erc1967_contract: "ERC1967Proxy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityConfig {
    pub router: Address,
    pub paired_token: Address,
    /// 十進位或 0x 開頭的十六進位字串
    pub threshold: String,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            router: JOE_ROUTER_ADDRESS,
            paired_token: MIM_ADDRESS,
            threshold: DEFAULT_SWAP_THRESHOLD.to_string(),
        }
    }
}

impl LiquidityConfig {
    pub fn threshold_value(&self) -> Result<U256> {
        U256::from_str(self.threshold.trim()).map_err(|e| DeployError::InvalidConfigValueError {
            field: "liquidity.threshold".to_string(),
            value: self.threshold.clone(),
            reason: format!("Not a valid uint256: {}", e),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_dir: Option<String>,
}

impl DeployConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parse_error = |e: toml::de::Error| DeployError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        };

        let table: toml::Table = toml::from_str(content).map_err(parse_error)?;
        let mut document = toml::Value::Table(table);
        Self::substitute_env_vars(&mut document)?;

        document.try_into().map_err(parse_error)
    }

    /// 在解析後的字串值中替換環境變數 (例如 ${DEPLOYER_PRIVATE_KEY})，未設定的變數原樣保留
    fn substitute_env_vars(value: &mut toml::Value) -> Result<()> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            DeployError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        Self::substitute_in_value(&re, value);
        Ok(())
    }

    fn substitute_in_value(re: &regex::Regex, value: &mut toml::Value) {
        match value {
            toml::Value::String(text) => {
                let replaced = re.replace_all(text, |caps: &regex::Captures| {
                    let var_name = &caps[1];
                    std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                });
                *text = replaced.into_owned();
            }
            toml::Value::Array(items) => {
                for item in items {
                    Self::substitute_in_value(re, item);
                }
            }
            toml::Value::Table(table) => {
                for (_, item) in table.iter_mut() {
                    Self::substitute_in_value(re, item);
                }
            }
            _ => {}
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("network.rpc_url", &self.network.rpc_url)?;

        validation::validate_range("network.confirmations", self.network.confirmations, 1, 64)?;
        validation::validate_range(
            "network.receipt_timeout_seconds",
            self.network.receipt_timeout_seconds,
            1,
            3600,
        )?;

        validation::validate_path("artifacts.path", &self.artifacts.path)?;
        if let Some(report_dir) = &self.output.report_dir {
            validation::validate_path("output.report_dir", report_dir)?;
        }

        validation::validate_non_empty_string("contracts.manager", &self.contracts.manager)?;
        validation::validate_non_empty_string("contracts.token", &self.contracts.token)?;
        validation::validate_non_empty_string(
            "contracts.wallet_observer",
            &self.contracts.wallet_observer,
        )?;
        validation::validate_non_empty_string(
            "contracts.liquidity_pool_manager",
            &self.contracts.liquidity_pool_manager,
        )?;
        validation::validate_non_empty_string("proxy.initializer", &self.proxy.initializer)?;

        validation::validate_non_zero_address("liquidity.router", &self.liquidity.router)?;
        validation::validate_non_zero_address(
            "liquidity.paired_token",
            &self.liquidity.paired_token,
        )?;
        if self.liquidity.threshold_value()?.is_zero() {
            return Err(DeployError::InvalidConfigValueError {
                field: "liquidity.threshold".to_string(),
                value: self.liquidity.threshold.clone(),
                reason: "Threshold must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// 送交易前必須有私鑰；未替換的 ${VAR} 視為缺少
    pub fn private_key(&self) -> Result<&str> {
        let key = validation::validate_required_field("network.private_key", &self.network.private_key)?;
        if key.trim().is_empty() || key.starts_with("${") {
            return Err(DeployError::MissingConfigError {
                field: "network.private_key".to_string(),
            });
        }
        Ok(key.trim())
    }
}

impl Validate for DeployConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
