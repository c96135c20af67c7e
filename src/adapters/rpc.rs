use crate::domain::model::{DeployRequest, DeployedContract, TxOutcome};
use crate::domain::ports::ChainClient;
use crate::utils::error::{DeployError, Result};
use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// 透過 HTTP JSON-RPC 與節點互動，交易由本地私鑰簽署
pub struct AlloyChainClient {
    provider: DynProvider,
    deployer: Address,
    confirmations: u64,
    receipt_timeout: Duration,
}

impl AlloyChainClient {
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let url = Url::parse(rpc_url).map_err(|e| DeployError::InvalidConfigValueError {
            field: "network.rpc_url".to_string(),
            value: rpc_url.to_string(),
            reason: e.to_string(),
        })?;
        let signer: PrivateKeySigner = private_key.parse()?;
        let deployer = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            deployer,
            confirmations: 1,
            receipt_timeout: Duration::from_secs(120),
        })
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    async fn submit(&self, tx: TransactionRequest) -> Result<TransactionReceipt> {
        let pending = self.provider.send_transaction(tx).await?;
        tracing::debug!("Submitted transaction {}", pending.tx_hash());

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await?;
        Ok(receipt)
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract> {
        let tx = TransactionRequest::default().with_deploy_code(request.init_code());
        let receipt = self.submit(tx).await?;
        let transaction_hash = receipt.transaction_hash();

        if !receipt.status() {
            return Err(DeployError::TransactionReverted {
                action: format!("deploy {}", request.contract),
                transaction_hash,
            });
        }

        let address = receipt
            .contract_address()
            .ok_or_else(|| DeployError::MissingContractAddress {
                contract: request.contract.clone(),
                transaction_hash,
            })?;

        Ok(DeployedContract {
            contract: request.contract,
            address,
            transaction_hash,
        })
    }

    async fn send(&self, to: Address, calldata: Bytes) -> Result<TxOutcome> {
        let tx = TransactionRequest::default().with_to(to).with_input(calldata);
        let receipt = self.submit(tx).await?;
        let transaction_hash = receipt.transaction_hash();

        if !receipt.status() {
            return Err(DeployError::TransactionReverted {
                action: format!("call to {}", to),
                transaction_hash,
            });
        }

        Ok(TxOutcome {
            transaction_hash,
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
        })
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(calldata);
        Ok(self.provider.call(tx).await?)
    }

    async fn storage_at(&self, address: Address, slot: B256) -> Result<B256> {
        let value = self
            .provider
            .get_storage_at(address, U256::from_be_bytes(slot.0))
            .await?;
        Ok(B256::from(value.to_be_bytes::<32>()))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }
}
