use crate::domain::model::{ContractArtifact, DeployRequest, DeployedContract, TxOutcome};
use crate::utils::error::Result;
use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;

/// 與鏈互動的唯一出口，所有交易都經由同一個 signer 依序送出
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// 送出交易的帳戶
    fn deployer(&self) -> Address;

    async fn chain_id(&self) -> Result<u64>;

    /// 送出建立交易並等待 receipt
    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract>;

    /// 送出會改變狀態的交易並等待 receipt，revert 時回傳錯誤
    async fn send(&self, to: Address, calldata: Bytes) -> Result<TxOutcome>;

    /// 唯讀呼叫 (eth_call)
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes>;

    async fn storage_at(&self, address: Address, slot: B256) -> Result<B256>;

    async fn code_at(&self, address: Address) -> Result<Bytes>;
}

/// 依合約名稱查找編譯產物
pub trait ArtifactSource: Send + Sync {
    fn load(&self, contract_name: &str) -> Result<ContractArtifact>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
