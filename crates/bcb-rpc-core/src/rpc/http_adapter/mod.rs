//! JSON-RPC client for BCB nodes.
//!
//! Resolves the remote address into a request URL plus a dialer pinned to
//! the configured TCP or Unix-domain target, posts named-parameter envelopes
//! with `hyper` (plain) or `reqwest` over rustls (HTTPS), and decodes the
//! response envelope.

mod client;
mod connection;
mod dialer;
mod methods;
mod protocol;
mod tls;
mod transport;

pub use client::{ClientOptions, JsonRpcClient, DEFAULT_IDLE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use connection::{resolve, Endpoint, Network, Scheme};
pub use dialer::{DialedStream, Dialer};
pub use protocol::{CONTENT_TYPE, REQUEST_ID};
pub use tls::TrustPolicy;
pub use transport::{HttpReply, Transport};
