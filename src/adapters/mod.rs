// Adapters layer: concrete implementations of the domain ports (JSON-RPC, artifact directory, local disk).

pub mod artifacts;
pub mod rpc;
pub mod storage;

pub use artifacts::HardhatArtifacts;
pub use rpc::AlloyChainClient;
pub use storage::LocalStorage;
