use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::RpcError;

use super::connection::{Endpoint, Scheme};
use super::protocol::{decode_response, encode_request, redacted_request};
use super::tls::{build_https_client, TrustPolicy};
use super::transport::{DialedTransport, HttpsTransport, Transport};

/// Per-request deadline applied unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// How long a pooled connection may sit idle before it is closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Knobs for [`JsonRpcClient::with_options`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Deadline for one full call (connect, send, read). `None` waits forever.
    pub request_timeout: Option<Duration>,
    pub idle_timeout: Duration,
    /// Never reuse connections.
    pub disable_keep_alive: bool,
    /// Only consulted for `https://` remotes.
    pub trust: TrustPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            disable_keep_alive: false,
            trust: TrustPolicy::default(),
        }
    }
}

impl ClientOptions {
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn disable_keep_alive(mut self, disable: bool) -> Self {
        self.disable_keep_alive = disable;
        self
    }

    pub fn trust(mut self, trust: TrustPolicy) -> Self {
        self.trust = trust;
        self
    }
}

// ==============================================================================
// JsonRpcClient
// ==============================================================================

/// JSON-RPC 2.0 client for a BCB node over HTTP, HTTPS or a Unix socket.
///
/// Immutable once built; share it behind an `Arc`. Each [`call`] performs
/// exactly one HTTP round-trip. Dropping the returned future cancels it.
///
/// [`call`]: JsonRpcClient::call
pub struct JsonRpcClient {
    url: String,
    transport: Box<dyn Transport>,
}

impl JsonRpcClient {
    /// Client for `remote` with default options.
    ///
    /// Plain remotes (`host:port`, `tcp://`, `unix://`, `http://`) never fail
    /// here: a malformed address is reported as `InvalidAddress` by the first
    /// call. `https://` remotes verify the node against the bundled root set.
    pub fn new(remote: &str) -> Result<Self, RpcError> {
        Self::with_options(remote, ClientOptions::default())
    }

    /// HTTPS-oriented constructor.
    ///
    /// With `ca_file`, the PEM bundle is the only trust anchor and must load.
    /// Without it the node's certificate is NOT verified; prefer
    /// [`with_options`](Self::with_options) and [`TrustPolicy::WebPki`] when
    /// the node has a publicly trusted certificate.
    pub fn new_tls(
        remote: &str,
        ca_file: Option<&Path>,
        disable_keep_alive: bool,
    ) -> Result<Self, RpcError> {
        let trust = match ca_file {
            Some(path) => TrustPolicy::CaBundle(path.to_path_buf()),
            None => TrustPolicy::AcceptAny,
        };
        let options = ClientOptions::default()
            .disable_keep_alive(disable_keep_alive)
            .trust(trust);
        Self::https(remote, &options)
    }

    pub fn with_options(remote: &str, options: ClientOptions) -> Result<Self, RpcError> {
        let endpoint = Endpoint::resolve(remote);

        if endpoint.scheme == Scheme::Https {
            // TLS goes through the standard connector and keeps the URL as given.
            return Self::https(remote, &options);
        }

        let transport = DialedTransport::new(
            remote,
            &endpoint,
            options.request_timeout,
            options.idle_timeout,
            options.disable_keep_alive,
        );
        Ok(Self {
            url: endpoint.request_url,
            transport: Box::new(transport),
        })
    }

    fn https(remote: &str, options: &ClientOptions) -> Result<Self, RpcError> {
        let client = build_https_client(
            &options.trust,
            options.request_timeout,
            options.idle_timeout,
            options.disable_keep_alive,
        )?;
        Ok(Self {
            url: remote.to_owned(),
            transport: Box::new(HttpsTransport::new(client, remote)),
        })
    }

    /// Client over a caller-supplied transport; `url` is only used for
    /// logging.
    pub fn from_transport(url: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            url: url.to_owned(),
            transport,
        }
    }

    /// URL requests are addressed to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Invoke `method` with named `params` and decode the `result` into `T`.
    ///
    /// `params` must serialize to a JSON object. A non-null `error` in the
    /// response is returned as [`RpcError::Remote`] even if a `result` is
    /// also present.
    pub async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, RpcError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_request(method, params)?;
        debug!(
            rpc.method = method,
            rpc.url = %self.url,
            body_len = body.len(),
            "rpc call"
        );
        trace!(rpc.method = method, body = %redacted_request(&body), "rpc request body");

        let reply = self.transport.post(body).await?;
        debug!(
            rpc.method = method,
            status = reply.status,
            body_len = reply.body.len(),
            "rpc response"
        );
        trace!(
            rpc.method = method,
            body = %String::from_utf8_lossy(&reply.body),
            "rpc response body"
        );

        decode_response(reply.status, &reply.body)
    }
}
