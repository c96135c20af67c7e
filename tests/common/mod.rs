#![allow(dead_code)]

use alloy::json_abi::JsonAbi;
use alloy::primitives::{address, Address, Bytes, B256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use orion_deployer::core::contracts::IOrionProtocol;
use orion_deployer::core::upgrades::{ADMIN_SLOT, IMPLEMENTATION_SLOT};
use orion_deployer::domain::model::{ContractArtifact, DeployRequest, DeployedContract, TxOutcome};
use orion_deployer::domain::ports::{ArtifactSource, ChainClient};
use orion_deployer::{DeployError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const DEPLOYER: Address = address!("dededededededededededededededededededede");
pub const TAMPERED: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

#[derive(Debug, Clone, PartialEq)]
pub enum ChainEvent {
    Deploy {
        contract: String,
        address: Address,
        constructor_args: Bytes,
    },
    Send {
        to: Address,
        selector: [u8; 4],
    },
    Call {
        to: Address,
        selector: [u8; 4],
    },
}

#[derive(Default)]
struct MockState {
    next_address: u64,
    events: Vec<ChainEvent>,
    code: HashMap<Address, Bytes>,
    storage: HashMap<(Address, B256), B256>,
    wallet_observer: HashMap<Address, Address>,
    liquidity_pool_manager: HashMap<Address, Address>,
}

/// 記錄每一筆呼叫的記憶體內鏈，可注入失敗
#[derive(Clone)]
pub struct MockChain {
    state: Arc<Mutex<MockState>>,
    chain_id: u64,
    fail_deploy_of: Option<String>,
    revert_selector: Option<[u8; 4]>,
    tamper_reads: bool,
    no_code_for: Option<String>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                next_address: 0x1000,
                ..Default::default()
            })),
            chain_id: 31337,
            fail_deploy_of: None,
            revert_selector: None,
            tamper_reads: false,
            no_code_for: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn failing_deploy_of(mut self, contract: &str) -> Self {
        self.fail_deploy_of = Some(contract.to_string());
        self
    }

    pub fn reverting(mut self, selector: [u8; 4]) -> Self {
        self.revert_selector = Some(selector);
        self
    }

    pub fn tampering_reads(mut self) -> Self {
        self.tamper_reads = true;
        self
    }

    pub fn without_code_for(mut self, contract: &str) -> Self {
        self.no_code_for = Some(contract.to_string());
        self
    }

    pub fn events(&self) -> Vec<ChainEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn deployments(&self) -> Vec<(String, Address, Bytes)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Deploy {
                    contract,
                    address,
                    constructor_args,
                } => Some((contract, address, constructor_args)),
                _ => None,
            })
            .collect()
    }

    pub fn deployed_contracts(&self) -> Vec<String> {
        self.deployments().into_iter().map(|(name, _, _)| name).collect()
    }

    pub fn sent_selectors(&self) -> Vec<[u8; 4]> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Send { selector, .. } => Some(selector),
                _ => None,
            })
            .collect()
    }

    pub fn called_selectors(&self) -> Vec<[u8; 4]> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Call { selector, .. } => Some(selector),
                _ => None,
            })
            .collect()
    }

    fn tx_hash(counter: u64) -> B256 {
        B256::left_padding_from(&counter.to_be_bytes())
    }
}

fn selector_of(calldata: &[u8]) -> [u8; 4] {
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&calldata[..4]);
    selector
}

#[async_trait]
impl ChainClient for MockChain {
    fn deployer(&self) -> Address {
        DEPLOYER
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract> {
        let mut state = self.state.lock().unwrap();
        state.next_address += 1;
        let counter = state.next_address;
        let transaction_hash = Self::tx_hash(counter);

        if self.fail_deploy_of.as_deref() == Some(request.contract.as_str()) {
            return Err(DeployError::TransactionReverted {
                action: format!("deploy {}", request.contract),
                transaction_hash,
            });
        }

        let address = Address::left_padding_from(&counter.to_be_bytes());
        let args = request.constructor_args.clone();

        match request.contract.as_str() {
            "TransparentUpgradeableProxy" => {
                let (logic, admin, _data) =
                    <(Address, Address, Bytes)>::abi_decode_params(&args)?;
                state
                    .storage
                    .insert((address, IMPLEMENTATION_SLOT), logic.into_word());
                state.storage.insert((address, ADMIN_SLOT), admin.into_word());
            }
            "ERC1967Proxy" => {
                let (logic, _data) = <(Address, Bytes)>::abi_decode_params(&args)?;
                state
                    .storage
                    .insert((address, IMPLEMENTATION_SLOT), logic.into_word());
            }
            _ => {}
        }

        if self.no_code_for.as_deref() != Some(request.contract.as_str()) {
            state.code.insert(address, Bytes::from(vec![0x60, 0x80, 0xfe]));
        }

        state.events.push(ChainEvent::Deploy {
            contract: request.contract.clone(),
            address,
            constructor_args: args,
        });

        Ok(DeployedContract {
            contract: request.contract,
            address,
            transaction_hash,
        })
    }

    async fn send(&self, to: Address, calldata: Bytes) -> Result<TxOutcome> {
        let mut state = self.state.lock().unwrap();
        let selector = selector_of(&calldata);
        state.events.push(ChainEvent::Send { to, selector });
        state.next_address += 1;
        let transaction_hash = Self::tx_hash(state.next_address);

        if self.revert_selector == Some(selector) {
            return Err(DeployError::TransactionReverted {
                action: format!("call to {}", to),
                transaction_hash,
            });
        }

        if selector == IOrionProtocol::changeWalletObserverImplementationCall::SELECTOR {
            let call = IOrionProtocol::changeWalletObserverImplementationCall::abi_decode(&calldata)?;
            state.wallet_observer.insert(to, call.newWalletObserver);
        } else if selector == IOrionProtocol::changeLiquidityPoolManagerImplementationCall::SELECTOR {
            let call =
                IOrionProtocol::changeLiquidityPoolManagerImplementationCall::abi_decode(&calldata)?;
            state.liquidity_pool_manager.insert(to, call.newLiquidityPoolManager);
        }

        Ok(TxOutcome {
            transaction_hash,
            block_number: Some(state.next_address),
            gas_used: 21_000,
        })
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let mut state = self.state.lock().unwrap();
        let selector = selector_of(&calldata);
        state.events.push(ChainEvent::Call { to, selector });

        let stored = if selector == IOrionProtocol::getWalletObserverImplementationCall::SELECTOR {
            state.wallet_observer.get(&to).copied()
        } else if selector == IOrionProtocol::getLiquidityPoolManagerImplementationCall::SELECTOR {
            state.liquidity_pool_manager.get(&to).copied()
        } else {
            None
        };

        let value = if self.tamper_reads {
            TAMPERED
        } else {
            stored.unwrap_or(Address::ZERO)
        };
        Ok(value.abi_encode().into())
    }

    async fn storage_at(&self, address: Address, slot: B256) -> Result<B256> {
        let state = self.state.lock().unwrap();
        Ok(state
            .storage
            .get(&(address, slot))
            .copied()
            .unwrap_or(B256::ZERO))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        let state = self.state.lock().unwrap();
        Ok(state.code.get(&address).cloned().unwrap_or_default())
    }
}

/// 以合約名稱為 key 的記憶體內 artifact
#[derive(Clone, Default)]
pub struct InMemoryArtifacts {
    artifacts: HashMap<String, ContractArtifact>,
}

const INITIALIZE_ABI: &str = r#"[{"type":"function","name":"initialize","inputs":[],"outputs":[],"stateMutability":"nonpayable"}]"#;

impl InMemoryArtifacts {
    /// 部署流程用到的全部合約
    pub fn standard() -> Self {
        let mut artifacts = Self::default();
        artifacts.insert("OrionsManagerUpgradeable", INITIALIZE_ABI, 0x01);
        artifacts.insert("OrionProtocol", "[]", 0x02);
        artifacts.insert("WalletObserverUpgradeable", INITIALIZE_ABI, 0x03);
        artifacts.insert("LiquidityPoolManager", "[]", 0x04);
        artifacts.insert("ProxyAdmin", "[]", 0x05);
        artifacts.insert("TransparentUpgradeableProxy", "[]", 0x06);
        artifacts.insert("ERC1967Proxy", "[]", 0x07);
        artifacts
    }

    pub fn insert(&mut self, name: &str, abi: &str, marker: u8) {
        self.artifacts.insert(
            name.to_string(),
            ContractArtifact {
                contract_name: name.to_string(),
                source_name: format!("contracts/{}.sol", name),
                abi: serde_json::from_str::<JsonAbi>(abi).unwrap(),
                bytecode: Bytes::from(vec![0x60, 0x80, marker]),
            },
        );
    }

    pub fn without(mut self, name: &str) -> Self {
        self.artifacts.remove(name);
        self
    }
}

impl ArtifactSource for InMemoryArtifacts {
    fn load(&self, contract_name: &str) -> Result<ContractArtifact> {
        self.artifacts
            .get(contract_name)
            .cloned()
            .ok_or_else(|| DeployError::ArtifactNotFound {
                contract: contract_name.to_string(),
                search_path: "memory".to_string(),
            })
    }
}
