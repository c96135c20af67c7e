use crate::config::toml_config::ProxyConfig;
use crate::core::factory::ContractFactory;
use crate::domain::model::{ContractArtifact, ProxyDeployment, ProxyKind};
use crate::domain::ports::{ArtifactSource, ChainClient};
use crate::utils::error::{DeployError, Result};
use alloy::primitives::{b256, Address, Bytes, B256};
use alloy::sol_types::SolValue;
use tokio::sync::OnceCell;

/// `bytes32(uint256(keccak256("eip1967.proxy.implementation")) - 1)`
pub const IMPLEMENTATION_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// `bytes32(uint256(keccak256("eip1967.proxy.admin")) - 1)`
pub const ADMIN_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// 讀取 proxy 的 implementation 地址
pub async fn implementation_address<C: ChainClient + ?Sized>(
    client: &C,
    proxy: Address,
) -> Result<Address> {
    let word = client.storage_at(proxy, IMPLEMENTATION_SLOT).await?;
    let implementation = Address::from_word(word);
    if implementation.is_zero() {
        return Err(DeployError::ImplementationNotFound { proxy });
    }
    Ok(implementation)
}

/// 讀取 transparent proxy 的 admin 地址，UUPS proxy 沒有 admin 時回傳 None
pub async fn admin_address<C: ChainClient + ?Sized>(
    client: &C,
    proxy: Address,
) -> Result<Option<Address>> {
    let word = client.storage_at(proxy, ADMIN_SLOT).await?;
    let admin = Address::from_word(word);
    Ok((!admin.is_zero()).then_some(admin))
}

/// 依名稱或完整簽名 (`initialize(address)`) 找出 initializer，組成 `selector ++ args`
///
/// 只給名稱時，有參數的 overload 超過一個就無法判斷，必須改用完整簽名。
pub fn encode_initializer(
    artifact: &ContractArtifact,
    initializer: &str,
    encoded_args: &[u8],
) -> Result<Bytes> {
    let not_found = || DeployError::InitializerNotFound {
        contract: artifact.contract_name.clone(),
        initializer: initializer.to_string(),
    };

    let name = initializer
        .split_once('(')
        .map_or(initializer, |(name, _)| name);
    let overloads = artifact.abi.function(name).ok_or_else(not_found)?;

    let function = if initializer.contains('(') {
        overloads
            .iter()
            .find(|f| f.signature() == initializer)
            .ok_or_else(not_found)?
    } else {
        let candidates: Vec<_> = overloads
            .iter()
            .filter(|f| f.inputs.is_empty() == encoded_args.is_empty())
            .collect();
        match candidates.as_slice() {
            [] => return Err(not_found()),
            [function] => *function,
            _ => {
                return Err(DeployError::AmbiguousInitializer {
                    contract: artifact.contract_name.clone(),
                    initializer: initializer.to_string(),
                    candidates: candidates.iter().map(|f| f.signature()).collect(),
                })
            }
        }
    };

    let mut data = function.selector().to_vec();
    data.extend_from_slice(encoded_args);
    Ok(data.into())
}

pub struct Upgrades {
    options: ProxyConfig,
    proxy_admin: OnceCell<Address>,
}

impl Upgrades {
    pub fn new(options: ProxyConfig) -> Self {
        Self {
            options,
            proxy_admin: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> ProxyKind {
        self.options.kind
    }

    pub fn proxy_contract(&self) -> &str {
        match self.options.kind {
            ProxyKind::Transparent => &self.options.transparent_contract,
            ProxyKind::Uups => &self.options.erc1967_contract,
        }
    }

    /// 部署 implementation 與 proxy，並透過 initializer 初始化
    pub async fn deploy_proxy<C, A>(
        &self,
        artifacts: &A,
        factory: &ContractFactory<'_, C>,
        init_args: Bytes,
    ) -> Result<ProxyDeployment>
    where
        C: ChainClient,
        A: ArtifactSource + ?Sized,
    {
        let client = factory.client();

        // 先解析 initializer 與 proxy artifact，任何交易送出前就能發現錯誤
        let init_data = encode_initializer(factory.artifact(), &self.options.initializer, &init_args)?;
        let proxy_factory = ContractFactory::from_source(client, artifacts, self.proxy_contract())?;

        let implementation = factory.deploy(Bytes::new()).await?;
        tracing::debug!(
            "{} implementation deployed at {}",
            factory.contract_name(),
            implementation.address
        );

        let (constructor_args, admin) = match self.options.kind {
            ProxyKind::Transparent => {
                let admin = self.ensure_proxy_admin(artifacts, client).await?;
                let args = (implementation.address, admin, init_data).abi_encode_params();
                (args, Some(admin))
            }
            ProxyKind::Uups => {
                let args = (implementation.address, init_data).abi_encode_params();
                (args, None)
            }
        };

        let proxy = proxy_factory.deploy(constructor_args.into()).await?;

        let recorded = implementation_address(client, proxy.address).await?;
        if recorded != implementation.address {
            return Err(DeployError::RegistrationMismatch {
                registry: "ERC-1967 implementation slot".to_string(),
                expected: implementation.address,
                actual: recorded,
            });
        }

        Ok(ProxyDeployment {
            proxy: proxy.address,
            implementation: recorded,
            admin,
            kind: self.options.kind,
        })
    }

    async fn ensure_proxy_admin<C, A>(&self, artifacts: &A, client: &C) -> Result<Address>
    where
        C: ChainClient,
        A: ArtifactSource + ?Sized,
    {
        let admin = self
            .proxy_admin
            .get_or_try_init(|| async {
                let admin_factory =
                    ContractFactory::from_source(client, artifacts, &self.options.admin_contract)?;
                let deployed = admin_factory.deploy(Bytes::new()).await?;
                tracing::info!("ProxyAdmin deployed to: {}", deployed.address);
                Ok::<_, DeployError>(deployed.address)
            })
            .await?;
        Ok(*admin)
    }
}
