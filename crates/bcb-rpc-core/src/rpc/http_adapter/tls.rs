use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RpcError;

/// How an HTTPS client decides whether to trust the node's certificate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    /// Verify against the bundled Mozilla root set.
    #[default]
    WebPki,
    /// Verify against the certificates in this PEM file only.
    CaBundle(PathBuf),
    /// Accept any server certificate. Verification is OFF: anyone on the path
    /// can impersonate the node. Kept for nodes with ad-hoc self-signed
    /// certificates.
    AcceptAny,
}

/// Read every certificate from a PEM bundle.
pub(super) fn load_trust_bundle(path: &Path) -> Result<Vec<reqwest::Certificate>, RpcError> {
    let bundle_err = |reason: String| RpcError::TrustBundleLoad {
        path: path.to_path_buf(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| bundle_err(e.to_string()))?;
    let certs = reqwest::Certificate::from_pem_bundle(&pem)
        .map_err(|e| bundle_err(format!("invalid PEM: {e}")))?;
    if certs.is_empty() {
        return Err(bundle_err("no PEM certificates found".to_owned()));
    }
    Ok(certs)
}

pub(super) fn build_https_client(
    trust: &TrustPolicy,
    timeout: Option<Duration>,
    idle_timeout: Duration,
    disable_keep_alive: bool,
) -> Result<reqwest::Client, RpcError> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .pool_idle_timeout(idle_timeout)
        .tcp_nodelay(true);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if disable_keep_alive {
        builder = builder.pool_max_idle_per_host(0);
    }

    builder = match trust {
        TrustPolicy::WebPki => builder,
        TrustPolicy::CaBundle(path) => {
            let certs = load_trust_bundle(path)?;
            debug!(path = %path.display(), certs = certs.len(), "loaded trust bundle");
            certs
                .into_iter()
                .fold(builder.tls_built_in_root_certs(false), |b, cert| {
                    b.add_root_certificate(cert)
                })
        }
        TrustPolicy::AcceptAny => {
            warn!("TLS certificate verification is disabled; the node's identity is not checked");
            builder.danger_accept_invalid_certs(true)
        }
    };

    builder.build().map_err(|e| match trust {
        TrustPolicy::CaBundle(path) => RpcError::TrustBundleLoad {
            path: path.clone(),
            reason: e.to_string(),
        },
        _ => RpcError::Transport(e.into()),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;

    const TEST_CA: &str = include_str!("../../../tests/fixtures/test-ca.pem");

    #[test]
    fn missing_bundle_is_trust_error() {
        let err = load_trust_bundle(Path::new("/nonexistent/bcb-ca.pem"))
            .expect_err("missing file must fail");
        assert_eq!(err.kind(), ErrorKind::TrustBundleLoad);
        assert!(err.to_string().contains("/nonexistent/bcb-ca.pem"));
    }

    #[test]
    fn bundle_without_certificates_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"not a certificate\n").expect("write temp file");

        let err = load_trust_bundle(file.path()).expect_err("no certs must fail");
        assert!(err.to_string().contains("no PEM certificates found"));
    }

    #[test]
    fn bundle_certificates_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(TEST_CA.as_bytes()).expect("write temp file");

        let certs = load_trust_bundle(file.path()).expect("fixture CA must load");
        assert_eq!(certs.len(), 1);
    }

    #[test]
    fn default_policy_verifies() {
        assert_eq!(TrustPolicy::default(), TrustPolicy::WebPki);
    }
}
