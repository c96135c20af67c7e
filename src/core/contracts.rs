use crate::domain::model::TxOutcome;
use crate::domain::ports::ChainClient;
use crate::utils::error::Result;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};

sol! {
    /// OrionProtocol ERC-20 上用來登記外部合約的介面
    interface IOrionProtocol {
        function changeWalletObserverImplementation(address newWalletObserver) external;
        function getWalletObserverImplementation() external view returns (address);
        function changeLiquidityPoolManagerImplementation(address newLiquidityPoolManager) external;
        function getLiquidityPoolManagerImplementation() external view returns (address);
    }
}

/// `OrionProtocol(address manager)`
pub fn token_constructor_args(manager: Address) -> Bytes {
    (manager,).abi_encode_params().into()
}

/// `LiquidityPoolManager(address router, address[2] path, uint256 threshold)`
pub fn liquidity_pool_manager_constructor_args(
    router: Address,
    path: [Address; 2],
    threshold: U256,
) -> Bytes {
    (router, path, threshold).abi_encode_params().into()
}

/// 已部署的 OrionProtocol
pub struct TokenContract<'a, C: ChainClient> {
    address: Address,
    client: &'a C,
}

impl<'a, C: ChainClient> TokenContract<'a, C> {
    pub fn new(address: Address, client: &'a C) -> Self {
        Self { address, client }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn change_wallet_observer_implementation(&self, observer: Address) -> Result<TxOutcome> {
        let call = IOrionProtocol::changeWalletObserverImplementationCall {
            newWalletObserver: observer,
        };
        self.client.send(self.address, call.abi_encode().into()).await
    }

    pub async fn wallet_observer_implementation(&self) -> Result<Address> {
        let call = IOrionProtocol::getWalletObserverImplementationCall {};
        self.read_address(call.abi_encode()).await
    }

    pub async fn change_liquidity_pool_manager_implementation(
        &self,
        manager: Address,
    ) -> Result<TxOutcome> {
        let call = IOrionProtocol::changeLiquidityPoolManagerImplementationCall {
            newLiquidityPoolManager: manager,
        };
        self.client.send(self.address, call.abi_encode().into()).await
    }

    pub async fn liquidity_pool_manager_implementation(&self) -> Result<Address> {
        let call = IOrionProtocol::getLiquidityPoolManagerImplementationCall {};
        self.read_address(call.abi_encode()).await
    }

    async fn read_address(&self, calldata: Vec<u8>) -> Result<Address> {
        let output = self.client.call(self.address, calldata.into()).await?;
        Ok(Address::abi_decode(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{keccak256, B256};

    #[test]
    fn test_registration_selectors() {
        assert_eq!(
            IOrionProtocol::changeWalletObserverImplementationCall::SELECTOR,
            keccak256("changeWalletObserverImplementation(address)")[..4]
        );
        assert_eq!(
            IOrionProtocol::getLiquidityPoolManagerImplementationCall::SELECTOR,
            keccak256("getLiquidityPoolManagerImplementation()")[..4]
        );
    }

    #[test]
    fn test_liquidity_pool_manager_args_layout() {
        let router = Address::repeat_byte(0x01);
        let mim = Address::repeat_byte(0x02);
        let token = Address::repeat_byte(0x03);
        let threshold = U256::from(10u64).pow(U256::from(25u64));

        let args = liquidity_pool_manager_constructor_args(router, [mim, token], threshold);

        // address[2] 是靜態型別，直接展開成四個 word
        assert_eq!(args.len(), 4 * 32);
        assert_eq!(B256::from_slice(&args[0..32]), router.into_word());
        assert_eq!(B256::from_slice(&args[32..64]), mim.into_word());
        assert_eq!(B256::from_slice(&args[64..96]), token.into_word());
        assert_eq!(U256::from_be_slice(&args[96..128]), threshold);
    }

    #[test]
    fn test_token_args_is_single_word() {
        let manager = Address::repeat_byte(0xab);
        let args = token_constructor_args(manager);
        assert_eq!(args.to_vec(), manager.into_word().to_vec());
    }
}
