use crate::domain::model::{ContractArtifact, DeployRequest, DeployedContract};
use crate::domain::ports::{ArtifactSource, ChainClient};
use crate::utils::error::{DeployError, Result};
use alloy::primitives::Bytes;

/// 綁定一份 artifact 與 client，負責送出建立交易
pub struct ContractFactory<'a, C: ChainClient> {
    client: &'a C,
    artifact: ContractArtifact,
}

impl<'a, C: ChainClient> ContractFactory<'a, C> {
    pub fn new(client: &'a C, artifact: ContractArtifact) -> Self {
        Self { client, artifact }
    }

    /// 依名稱查找 artifact 並建立 factory
    pub fn from_source<A: ArtifactSource + ?Sized>(
        client: &'a C,
        artifacts: &A,
        contract_name: &str,
    ) -> Result<Self> {
        Ok(Self::new(client, artifacts.load(contract_name)?))
    }

    pub fn client(&self) -> &'a C {
        self.client
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    pub fn contract_name(&self) -> &str {
        &self.artifact.contract_name
    }

    /// 部署並確認目標地址上已有程式碼
    pub async fn deploy(&self, constructor_args: Bytes) -> Result<DeployedContract> {
        tracing::debug!(
            "Deploying {} ({} bytes bytecode, {} bytes constructor args)",
            self.contract_name(),
            self.artifact.bytecode.len(),
            constructor_args.len()
        );

        let deployed = self
            .client
            .deploy(DeployRequest {
                contract: self.artifact.contract_name.clone(),
                bytecode: self.artifact.bytecode.clone(),
                constructor_args,
            })
            .await?;

        let code = self.client.code_at(deployed.address).await?;
        if code.is_empty() {
            return Err(DeployError::NoCodeAtAddress {
                contract: deployed.contract,
                address: deployed.address,
            });
        }

        tracing::debug!(
            "{} deployed at {} (tx {})",
            deployed.contract,
            deployed.address,
            deployed.transaction_hash
        );
        Ok(deployed)
    }
}
