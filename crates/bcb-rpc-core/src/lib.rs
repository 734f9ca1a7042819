pub mod error;
pub mod rpc;

pub use error::{ErrorKind, ResponseError, RpcError, TransportError};
pub use rpc::{BcbRpc, ClientOptions, JsonRpcClient, TrustPolicy};
