// Domain layer: value types and ports. Adapters implement the ports against real RPC and disk.

pub mod model;
pub mod ports;
