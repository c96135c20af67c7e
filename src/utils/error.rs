use alloy::primitives::{Address, B256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("RPC request failed: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("Waiting for transaction receipt failed: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("Invalid signer key: {0}")]
    Signer(#[from] alloy::signers::local::LocalSignerError),

    #[error("ABI encoding error: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Artifact for contract '{contract}' not found under {search_path}")]
    ArtifactNotFound {
        contract: String,
        search_path: String,
    },

    #[error("Multiple artifacts found for contract '{contract}': {candidates:?}")]
    AmbiguousArtifact {
        contract: String,
        candidates: Vec<String>,
    },

    #[error("Contract '{contract}' has unlinked libraries: {libraries:?}")]
    UnlinkedLibraries {
        contract: String,
        libraries: Vec<String>,
    },

    #[error("Invalid bytecode in artifact '{contract}': {reason}")]
    InvalidBytecode { contract: String, reason: String },

    #[error("Contract '{contract}' has no creation bytecode (abstract contract or interface?)")]
    EmptyBytecode { contract: String },

    #[error("Initializer '{initializer}' not found in ABI of '{contract}'")]
    InitializerNotFound {
        contract: String,
        initializer: String,
    },

    #[error("Initializer '{initializer}' of '{contract}' is overloaded, use one of: {candidates:?}")]
    AmbiguousInitializer {
        contract: String,
        initializer: String,
        candidates: Vec<String>,
    },

    #[error("Transaction {transaction_hash} reverted ({action})")]
    TransactionReverted {
        action: String,
        transaction_hash: B256,
    },

    #[error("Creation receipt for '{contract}' carries no contract address (tx {transaction_hash})")]
    MissingContractAddress {
        contract: String,
        transaction_hash: B256,
    },

    #[error("No code at {address} after deploying '{contract}'")]
    NoCodeAtAddress { contract: String, address: Address },

    #[error("No implementation recorded in ERC-1967 slot of proxy {proxy}")]
    ImplementationNotFound { proxy: Address },

    #[error("{registry} read back as {actual}, expected {expected}")]
    RegistrationMismatch {
        registry: String,
        expected: Address,
        actual: Address,
    },

    #[error("Connected to chain {actual}, config expects chain {expected}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Contract,
    Artifact,
    Configuration,
}

impl DeployError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::Rpc(_)
            | DeployError::PendingTransaction(_)
            | DeployError::ChainIdMismatch { .. } => ErrorCategory::Network,

            DeployError::TransactionReverted { .. }
            | DeployError::MissingContractAddress { .. }
            | DeployError::NoCodeAtAddress { .. }
            | DeployError::ImplementationNotFound { .. }
            | DeployError::RegistrationMismatch { .. }
            | DeployError::Abi(_) => ErrorCategory::Contract,

            DeployError::ArtifactNotFound { .. }
            | DeployError::AmbiguousArtifact { .. }
            | DeployError::UnlinkedLibraries { .. }
            | DeployError::EmptyBytecode { .. }
            | DeployError::InvalidBytecode { .. }
            | DeployError::InitializerNotFound { .. }
            | DeployError::AmbiguousInitializer { .. }
            | DeployError::Io(_)
            | DeployError::Serialization(_) => ErrorCategory::Artifact,

            DeployError::Signer(_)
            | DeployError::ConfigValidationError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Contract => format!("Contract call failed: {}", self),
            ErrorCategory::Artifact => format!("Could not load compiled contracts: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DeployError::Rpc(_) => "Check that the RPC endpoint is reachable and the URL is correct",
            DeployError::PendingTransaction(_) => {
                "Increase network.receipt_timeout_seconds or check the transaction in an explorer"
            }
            DeployError::ChainIdMismatch { .. } => {
                "Point network.rpc_url at the intended chain or update network.chain_id"
            }
            DeployError::Signer(_) => "Provide a 32-byte hex private key via DEPLOYER_PRIVATE_KEY",
            DeployError::ArtifactNotFound { .. } | DeployError::EmptyBytecode { .. } => {
                "Compile the contracts (npx hardhat compile) and check artifacts.path"
            }
            DeployError::AmbiguousArtifact { .. } => {
                "Rename one of the contracts so each contract name is unique"
            }
            DeployError::UnlinkedLibraries { .. } => {
                "Link or inline the external libraries before deploying"
            }
            DeployError::InitializerNotFound { .. } => "Set proxy.initializer to a function in the contract ABI",
            DeployError::AmbiguousInitializer { .. } => {
                "Set proxy.initializer to a full signature such as initialize(address)"
            }
            DeployError::TransactionReverted { .. } => {
                "Check the deployer's permissions and balance on the target contract"
            }
            DeployError::RegistrationMismatch { .. } => {
                "Inspect the token contract; another transaction may have changed the registration"
            }
            DeployError::ConfigValidationError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::MissingConfigError { .. } => "Fix the configuration file and try again",
            _ => "Re-run with --verbose for more detail",
        }
    }

    /// 所有失敗一律以狀態碼 1 結束
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
