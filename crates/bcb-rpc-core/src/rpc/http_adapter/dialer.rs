use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::rt::{Read, ReadBufCursor, Write};
use hyper::Uri;
use hyper_util::client::legacy::connect::{Connected, Connection};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tracing::trace;

use super::connection::Network;

// ==============================================================================
// Dialer: connector pinned to the pre-resolved target
// ==============================================================================

/// Connector handed to the HTTP client. Every connection goes to the
/// `(network, address)` resolved at construction; the URI the HTTP layer
/// passes in is ignored.
#[derive(Debug, Clone)]
pub struct Dialer {
    target: DialTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DialTarget {
    Socket { network: Network, address: String },
    Invalid { remote: String },
}

impl Dialer {
    pub(super) fn new(network: Network, address: &str) -> Self {
        Self {
            target: DialTarget::Socket {
                network,
                address: address.to_owned(),
            },
        }
    }

    pub(super) fn invalid(remote: &str) -> Self {
        Self {
            target: DialTarget::Invalid {
                remote: remote.to_owned(),
            },
        }
    }

    /// The resolved `(network, address)`, or `None` for a malformed remote.
    pub fn target(&self) -> Option<(Network, &str)> {
        match &self.target {
            DialTarget::Socket { network, address } => Some((*network, address)),
            DialTarget::Invalid { .. } => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.target, DialTarget::Invalid { .. })
    }

    /// The remote string as given, if it could not be resolved.
    pub fn invalid_remote(&self) -> Option<&str> {
        match &self.target {
            DialTarget::Invalid { remote } => Some(remote),
            DialTarget::Socket { .. } => None,
        }
    }

    /// Open a connection to the resolved target.
    pub async fn dial(&self) -> io::Result<DialedStream> {
        let (network, address) = match &self.target {
            DialTarget::Socket { network, address } => (*network, address.as_str()),
            DialTarget::Invalid { remote } => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid addr: {remote}"),
                ));
            }
        };
        trace!(%network, address, "dial");

        match network {
            Network::Tcp => {
                let stream = TcpStream::connect(address).await?;
                Ok(DialedStream::tcp(stream))
            }
            Network::Tcp4 | Network::Tcp6 => {
                let want_v4 = network == Network::Tcp4;
                let addrs: Vec<SocketAddr> = tokio::net::lookup_host(address)
                    .await?
                    .filter(|addr| addr.is_ipv4() == want_v4)
                    .collect();
                if addrs.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::AddrNotAvailable,
                        format!("no {network} address for {address}"),
                    ));
                }
                let stream = TcpStream::connect(&addrs[..]).await?;
                Ok(DialedStream::tcp(stream))
            }
            #[cfg(unix)]
            Network::Unix => {
                let stream = UnixStream::connect(address).await?;
                Ok(DialedStream {
                    inner: StreamKind::Unix(TokioIo::new(stream)),
                })
            }
            #[cfg(not(unix))]
            Network::Unix => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "unix domain sockets are not supported on this platform",
            )),
        }
    }
}

impl tower_service::Service<Uri> for Dialer {
    type Response = DialedStream;
    type Error = io::Error;
    type Future = Pin<Box<dyn Future<Output = io::Result<DialedStream>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _uri: Uri) -> Self::Future {
        let dialer = self.clone();
        Box::pin(async move { dialer.dial().await })
    }
}

// ==============================================================================
// DialedStream: TCP or Unix connection behind one type
// ==============================================================================

pub struct DialedStream {
    inner: StreamKind,
}

enum StreamKind {
    Tcp(TokioIo<TcpStream>),
    #[cfg(unix)]
    Unix(TokioIo<UnixStream>),
}

impl DialedStream {
    fn tcp(stream: TcpStream) -> Self {
        // Request/response traffic is small; don't let Nagle hold it back.
        if let Err(err) = stream.set_nodelay(true) {
            trace!(%err, "set_nodelay failed");
        }
        Self {
            inner: StreamKind::Tcp(TokioIo::new(stream)),
        }
    }
}

impl Connection for DialedStream {
    fn connected(&self) -> Connected {
        Connected::new()
    }
}

impl Read for DialedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            StreamKind::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            #[cfg(unix)]
            StreamKind::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl Write for DialedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut self.get_mut().inner {
            StreamKind::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            #[cfg(unix)]
            StreamKind::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            StreamKind::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            #[cfg(unix)]
            StreamKind::Unix(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            StreamKind::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            #[cfg(unix)]
            StreamKind::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tower_service::Service;

    use super::*;

    #[tokio::test]
    async fn dialer_ignores_requested_uri() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener must bind");
        let addr = listener.local_addr().expect("listener has address");

        let mut dialer = Dialer::new(Network::Tcp, &addr.to_string());
        let accept = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let _ = socket.read_to_end(&mut buf).await;
        });

        let uri: Uri = "http://somewhere-else.invalid:1/".parse().expect("uri");
        let stream = dialer
            .call(uri)
            .await
            .expect("dialer must reach the resolved target");
        match &stream.inner {
            StreamKind::Tcp(io) => {
                assert!(io.inner().nodelay().expect("nodelay readable"));
            }
            #[cfg(unix)]
            StreamKind::Unix(_) => panic!("tcp target dialed as unix"),
        }
        drop(stream);
        accept.await.expect("accept task");
    }

    #[tokio::test]
    async fn invalid_dialer_fails_without_io() {
        let dialer = Dialer::invalid("://://");
        let err = dialer.dial().await.err().expect("invalid dialer must fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("://://"));
        assert_eq!(dialer.invalid_remote(), Some("://://"));
    }

    #[tokio::test]
    async fn tcp4_dialer_rejects_v6_only_target() {
        let dialer = Dialer::new(Network::Tcp4, "[::1]:46657");
        let err = dialer.dial().await.err().expect("no v4 address available");
        assert_eq!(err.kind(), io::ErrorKind::AddrNotAvailable);
    }
}
