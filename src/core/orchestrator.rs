use crate::config::DeployConfig;
use crate::core::contracts::{self, TokenContract};
use crate::core::factory::ContractFactory;
use crate::core::upgrades::{self, Upgrades};
use crate::domain::model::{DeploymentReport, ProxyDeployment, ProxyKind};
use crate::domain::ports::{ArtifactSource, ChainClient};
use crate::utils::error::{DeployError, Result};
use alloy::primitives::{Address, Bytes, U256};
use chrono::Utc;

/// 依序部署 manager、token、wallet observer 與 liquidity pool manager
pub struct DeploymentOrchestrator<C: ChainClient, A: ArtifactSource> {
    client: C,
    artifacts: A,
    config: DeployConfig,
    upgrades: Upgrades,
}

impl<C: ChainClient, A: ArtifactSource> DeploymentOrchestrator<C, A> {
    pub fn new(client: C, artifacts: A, config: DeployConfig) -> Self {
        let upgrades = Upgrades::new(config.proxy.clone());
        Self {
            client,
            artifacts,
            config,
            upgrades,
        }
    }

    fn factory(&self, contract_name: &str) -> Result<ContractFactory<'_, C>> {
        ContractFactory::from_source(&self.client, &self.artifacts, contract_name)
    }

    pub async fn run(&self) -> Result<DeploymentReport> {
        let chain_id = self.preflight().await?;

        let orions_manager = self.deploy_manager().await?;
        let orion_protocol = self.deploy_token(orions_manager.proxy).await?;
        let (wallet_observer, registered_wallet_observer) =
            self.deploy_observer(&orion_protocol).await?;
        let (liquidity_pool_manager, registered_liquidity_pool_manager) =
            self.deploy_liquidity_manager(&orion_protocol).await?;

        Ok(DeploymentReport {
            chain_id,
            deployer: self.client.deployer(),
            orions_manager,
            orion_protocol: orion_protocol.address(),
            wallet_observer,
            liquidity_pool_manager,
            registered_wallet_observer,
            registered_liquidity_pool_manager,
            deployed_at: Utc::now(),
        })
    }

    /// 連線檢查，若設定了 chain_id 則必須一致
    async fn preflight(&self) -> Result<u64> {
        let chain_id = self.client.chain_id().await?;
        if let Some(expected) = self.config.network.chain_id {
            if expected != chain_id {
                return Err(DeployError::ChainIdMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        tracing::info!(
            "🔗 Connected to chain {} as deployer {}",
            chain_id,
            self.client.deployer()
        );
        Ok(chain_id)
    }

    pub async fn deploy_manager(&self) -> Result<ProxyDeployment> {
        let factory = self.factory(&self.config.contracts.manager)?;
        let deployment = self
            .upgrades
            .deploy_proxy(&self.artifacts, &factory, Bytes::new())
            .await?;

        tracing::info!("OrionsManagerProxy deployed to: {}", deployment.proxy);
        tracing::info!(
            "OrionsManagerImplementation deployed to: {}",
            deployment.implementation
        );
        Ok(deployment)
    }

    pub async fn deploy_token(&self, manager: Address) -> Result<TokenContract<'_, C>> {
        let factory = self.factory(&self.config.contracts.token)?;
        let deployed = factory
            .deploy(contracts::token_constructor_args(manager))
            .await?;

        tracing::info!("OrionProtocol ERC-20 deployed to: {}", deployed.address);
        Ok(TokenContract::new(deployed.address, &self.client))
    }

    /// 回傳 observer 部署結果與 token 上讀回的地址
    pub async fn deploy_observer(
        &self,
        token: &TokenContract<'_, C>,
    ) -> Result<(ProxyDeployment, Address)> {
        let factory = self.factory(&self.config.contracts.wallet_observer)?;
        let deployment = self
            .upgrades
            .deploy_proxy(&self.artifacts, &factory, Bytes::new())
            .await?;

        tracing::info!("WalletObserverProxy deployed to: {}", deployment.proxy);
        tracing::info!(
            "WalletObserverImplementation deployed to: {}",
            deployment.implementation
        );

        let outcome = token
            .change_wallet_observer_implementation(deployment.proxy)
            .await?;
        tracing::info!(
            "changeWalletObserverImplementation has been called (tx {})",
            outcome.transaction_hash
        );

        let registered = token.wallet_observer_implementation().await?;
        tracing::info!(
            "OrionProtocol - getWalletObserverImplementation: {}",
            registered
        );
        ensure_registered("walletObserver", deployment.proxy, registered)?;

        Ok((deployment, registered))
    }

    /// 回傳 liquidity pool manager 地址與 token 上讀回的地址
    pub async fn deploy_liquidity_manager(
        &self,
        token: &TokenContract<'_, C>,
    ) -> Result<(Address, Address)> {
        let liquidity = &self.config.liquidity;
        let threshold: U256 = liquidity.threshold_value()?;

        let factory = self.factory(&self.config.contracts.liquidity_pool_manager)?;
        let deployed = factory
            .deploy(contracts::liquidity_pool_manager_constructor_args(
                liquidity.router,
                [liquidity.paired_token, token.address()],
                threshold,
            ))
            .await?;

        tracing::info!("LiquidityPoolManager deployed to: {}", deployed.address);

        let outcome = token
            .change_liquidity_pool_manager_implementation(deployed.address)
            .await?;
        tracing::info!(
            "changeLiquidityPoolManagerImplementation has been called (tx {})",
            outcome.transaction_hash
        );

        let registered = token.liquidity_pool_manager_implementation().await?;
        tracing::info!(
            "OrionProtocol - getLiquidityPoolManagerImplementation: {}",
            registered
        );
        ensure_registered("liquidityPoolManager", deployed.address, registered)?;

        Ok((deployed.address, registered))
    }
}

/// 只解析 artifact 與 initializer，不送出任何交易
pub fn plan_deployment<A: ArtifactSource + ?Sized>(
    artifacts: &A,
    config: &DeployConfig,
) -> Result<Vec<String>> {
    let contracts = &config.contracts;
    let liquidity = &config.liquidity;
    let initializer = &config.proxy.initializer;
    let threshold = liquidity.threshold_value()?;
    let upgrades = Upgrades::new(config.proxy.clone());

    for name in [&contracts.manager, &contracts.wallet_observer] {
        let artifact = artifacts.load(name)?;
        upgrades::encode_initializer(&artifact, initializer, &[])?;
    }
    artifacts.load(&contracts.token)?;
    artifacts.load(&contracts.liquidity_pool_manager)?;
    artifacts.load(upgrades.proxy_contract())?;
    if upgrades.kind() == ProxyKind::Transparent {
        artifacts.load(&config.proxy.admin_contract)?;
    }

    let proxy = upgrades.proxy_contract();
    Ok(vec![
        format!(
            "1. {} via {} (initializer: {})",
            contracts.manager, proxy, initializer
        ),
        format!("2. {}(manager proxy)", contracts.token),
        format!(
            "3. {} via {} (initializer: {}), then changeWalletObserverImplementation",
            contracts.wallet_observer, proxy, initializer
        ),
        format!(
            "4. {}({}, [{}, token], {}), then changeLiquidityPoolManagerImplementation",
            contracts.liquidity_pool_manager, liquidity.router, liquidity.paired_token, threshold
        ),
    ])
}

fn ensure_registered(registry: &str, expected: Address, actual: Address) -> Result<()> {
    if expected != actual {
        return Err(DeployError::RegistrationMismatch {
            registry: registry.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
