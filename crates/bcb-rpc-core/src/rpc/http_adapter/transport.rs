use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{header, Request, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};

use crate::error::{RpcError, TransportError};

use super::connection::Endpoint;
use super::dialer::Dialer;
use super::protocol::CONTENT_TYPE;

/// Status and fully-read body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One POST of an encoded envelope to the node.
///
/// Implementations read the response body to completion (releasing the
/// connection) before returning, on success and on error alike.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, body: Vec<u8>) -> Result<HttpReply, RpcError>;
}

// ==============================================================================
// DialedTransport: HTTP/1.1 over the pinned TCP or Unix dialer
// ==============================================================================

pub(super) struct DialedTransport {
    client: Client<Dialer, Full<Bytes>>,
    uri: Option<Uri>,
    remote: String,
    invalid: bool,
    timeout: Option<Duration>,
}

impl DialedTransport {
    pub(super) fn new(
        remote: &str,
        endpoint: &Endpoint,
        timeout: Option<Duration>,
        idle_timeout: Duration,
        disable_keep_alive: bool,
    ) -> Self {
        let mut builder = Client::builder(TokioExecutor::new());
        builder
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(idle_timeout);
        if disable_keep_alive {
            builder.pool_max_idle_per_host(0);
        }

        Self {
            client: builder.build(endpoint.dialer.clone()),
            // Unparseable URLs surface as InvalidAddress on first use.
            uri: endpoint.request_url.parse().ok(),
            remote: remote.to_owned(),
            invalid: endpoint.dialer.is_invalid(),
            timeout,
        }
    }

    async fn exchange(&self, uri: Uri, body: Vec<u8>) -> Result<HttpReply, TransportError> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(Full::new(Bytes::from(body)))?;

        let response = self.client.request(request).await?;
        let status = response.status().as_u16();
        let body = response.into_body().collect().await?.to_bytes();

        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl Transport for DialedTransport {
    async fn post(&self, body: Vec<u8>) -> Result<HttpReply, RpcError> {
        let uri = match &self.uri {
            Some(uri) if !self.invalid => uri.clone(),
            _ => return Err(RpcError::InvalidAddress(self.remote.clone())),
        };

        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(uri, body))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => self.exchange(uri, body).await,
        };
        Ok(reply?)
    }
}

// ==============================================================================
// HttpsTransport: reqwest over rustls with the standard connector
// ==============================================================================

pub(super) struct HttpsTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpsTransport {
    pub(super) fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn post(&self, body: Vec<u8>) -> Result<HttpReply, RpcError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(TransportError::Https)?;
        let status = response.status().as_u16();

        let body = response.bytes().await.map_err(TransportError::Https)?;
        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}
