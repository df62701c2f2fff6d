pub mod endpoint_cache;
pub mod logging;
pub mod rpc_client;
pub mod rpc_validator;

pub use endpoint_cache::{EndpointCache, EndpointCacheEntry};
pub use rpc_client::{HttpRpcClient, RpcTransport};
