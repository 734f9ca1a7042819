use std::fmt;

use super::dialer::Dialer;

/// URL scheme the request is issued with. TLS is the transport's concern,
/// never the dialer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => "http://",
            Scheme::Https => "https://",
        }
    }
}

/// Socket family the dialer connects with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Tcp,
    Tcp4,
    Tcp6,
    Unix,
}

impl Network {
    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            // HTTP(S) always runs over TCP; TLS is layered on by the transport.
            "tcp" | "http" | "https" => Some(Network::Tcp),
            "tcp4" => Some(Network::Tcp4),
            "tcp6" => Some(Network::Tcp6),
            "unix" => Some(Network::Unix),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
            Network::Unix => "unix",
        })
    }
}

/// A remote address resolved once at client construction.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub scheme: Scheme,
    /// Fully qualified URL the HTTP layer is handed. Cosmetic when the
    /// dialer is in use: the dialer never looks at it.
    pub request_url: String,
    pub dialer: Dialer,
}

impl Endpoint {
    /// Resolve `remote` into a request URL and a dialer.
    ///
    /// Accepted forms: `host:port`, `tcp://host:port`, `tcp4://`, `tcp6://`,
    /// `unix:///path/to.sock`, `http://host:port[/path]` and
    /// `https://host:port[/path]`. Never fails; a malformed address yields a
    /// dialer that reports `InvalidAddress` when used.
    pub fn resolve(remote: &str) -> Self {
        let scheme = if remote.starts_with("https:") {
            Scheme::Https
        } else {
            Scheme::Http
        };
        let (host, dialer) = resolve(remote);
        Self {
            scheme,
            request_url: format!("{}{host}", scheme.prefix()),
            dialer,
        }
    }
}

/// Split `remote` into the URL host component and the dialer for it.
///
/// `/` in the host is rewritten to `.` so path-like legacy domains
/// (`unix:///var/run/node.sock`) survive as a URL authority. The dialer keeps
/// the untouched target.
pub fn resolve(remote: &str) -> (String, Dialer) {
    let (protocol, address) = match remote.split_once("://") {
        Some((protocol, address)) => (protocol, address),
        None => ("tcp", remote),
    };

    let host = address.replace('/', ".");
    let dialer = match Network::from_scheme(protocol) {
        Some(network) if is_dialable(address) => Dialer::new(network, address),
        _ => Dialer::invalid(remote),
    };
    (host, dialer)
}

fn is_dialable(address: &str) -> bool {
    !address.is_empty() && !address.contains("://")
}
