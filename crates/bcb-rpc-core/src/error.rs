use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ==============================================================================
// Error Types
// ==============================================================================

/// Everything a JSON-RPC call or client construction can fail with.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("invalid addr: {0}")]
    InvalidAddress(String),

    #[error("marshal request for `{method}`: {source}")]
    MarshalRequest {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unmarshal rpc response (HTTP {status}): {source}; body={body}")]
    DecodeEnvelope {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response error: {0}")]
    Remote(ResponseError),

    #[error("unmarshal rpc response result: {0}")]
    DecodeResult(#[source] serde_json::Error),

    #[error("load trust bundle {}: {reason}", path.display())]
    TrustBundleLoad { path: PathBuf, reason: String },

    /// A lower-level failure annotated with the inputs of the call that
    /// produced it.
    #[error("{context}: {source}")]
    Call {
        context: String,
        #[source]
        source: Box<RpcError>,
    },
}

/// Failures of the HTTP round-trip itself.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("build HTTP request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("HTTP error: {0}")]
    Send(#[from] hyper_util::client::legacy::Error),

    #[error("read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Https(#[from] reqwest::Error),
}

/// The kinds of failure a caller can branch on, independent of any context
/// layered on by the typed wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAddress,
    MarshalRequest,
    Transport,
    DecodeEnvelope,
    Remote,
    DecodeResult,
    TrustBundleLoad,
}

impl RpcError {
    /// Wrap this error with a description of the call that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        RpcError::Call {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, past any `Call` context layers.
    pub fn root(&self) -> &RpcError {
        match self {
            RpcError::Call { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            RpcError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            RpcError::MarshalRequest { .. } => ErrorKind::MarshalRequest,
            RpcError::Transport(_) => ErrorKind::Transport,
            RpcError::DecodeEnvelope { .. } => ErrorKind::DecodeEnvelope,
            RpcError::Remote(_) => ErrorKind::Remote,
            RpcError::DecodeResult(_) => ErrorKind::DecodeResult,
            RpcError::TrustBundleLoad { .. } => ErrorKind::TrustBundleLoad,
            RpcError::Call { .. } => unreachable!("root() never returns a Call layer"),
        }
    }

    /// Only transport failures are worth retrying; the library never retries
    /// on its own.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// The server-side error payload, if the node rejected the call.
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self.root() {
            RpcError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

// ==============================================================================
// Server Error Payload
// ==============================================================================

/// The non-null `error` member of a JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// A standard `{"code": <int>, "message": <string>, "data"?: <any>}` error.
    Server {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    /// Any other shape, kept verbatim.
    NonStandard(serde_json::Value),
}

impl ResponseError {
    /// Parse an envelope `error` value. Falls back to `NonStandard` when the
    /// value does not carry an integer code and a string message.
    pub fn from_value(value: serde_json::Value) -> Self {
        #[derive(serde::Deserialize)]
        struct JsonRpcError {
            code: i64,
            message: String,
            #[serde(default)]
            data: Option<serde_json::Value>,
        }

        match serde_json::from_value::<JsonRpcError>(value.clone()) {
            Ok(parsed) => ResponseError::Server {
                code: parsed.code,
                message: parsed.message,
                data: parsed.data,
            },
            Err(_) => ResponseError::NonStandard(value),
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            ResponseError::Server { code, .. } => Some(*code),
            ResponseError::NonStandard(_) => None,
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::Server {
                code,
                message,
                data: Some(data),
            } => write!(f, "{message} (code {code}, data {data})"),
            ResponseError::Server { code, message, .. } => write!(f, "{message} (code {code})"),
            ResponseError::NonStandard(value) => write!(f, "non-standard JSON-RPC error: {value}"),
        }
    }
}
