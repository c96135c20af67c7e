use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Bytes, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已編譯合約 (Hardhat artifact)
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// 一筆合約建立交易
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub contract: String,
    pub bytecode: Bytes,
    pub constructor_args: Bytes,
}

impl DeployRequest {
    /// creation bytecode 後接 ABI 編碼的建構子參數
    pub fn init_code(&self) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + self.constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&self.constructor_args);
        code.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    pub contract: String,
    pub address: Address,
    pub transaction_hash: B256,
}

/// 已上鏈且執行成功的交易
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    #[default]
    Transparent,
    Uups,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyDeployment {
    pub proxy: Address,
    pub implementation: Address,
    pub admin: Option<Address>,
    pub kind: ProxyKind,
}

/// 整個部署流程的輸出，寫成 JSON 報告
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub chain_id: u64,
    pub deployer: Address,
    pub orions_manager: ProxyDeployment,
    pub orion_protocol: Address,
    pub wallet_observer: ProxyDeployment,
    pub liquidity_pool_manager: Address,
    pub registered_wallet_observer: Address,
    pub registered_liquidity_pool_manager: Address,
    pub deployed_at: DateTime<Utc>,
}

impl DeploymentReport {
    /// 四個主要合約地址 (proxy 以 proxy 地址計)
    pub fn primary_addresses(&self) -> [Address; 4] {
        [
            self.orions_manager.proxy,
            self.orion_protocol,
            self.wallet_observer.proxy,
            self.liquidity_pool_manager,
        ]
    }
}
