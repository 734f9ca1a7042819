mod support;

use std::path::PathBuf;
use std::sync::Arc;

use bcb_rpc_core::rpc::{BcbRpc, JsonRpcClient};
use bcb_rpc_core::ErrorKind;
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

const HEIGHT_REPLY: &str = r#"{"jsonrpc":"2.0","id":"jsonrpc-client","result":{"lastBlock":42}}"#;

/// A throwaway CA and a leaf for `127.0.0.1`/`localhost` signed by it.
struct LoopbackPki {
    ca_pem: String,
    leaf: CertificateDer<'static>,
    leaf_key: PrivateKeyDer<'static>,
}

fn loopback_pki() -> LoopbackPki {
    let ca_key = KeyPair::generate().expect("ca key");
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params
        .distinguished_name
        .push(DnType::CommonName, "bcb-rpc loopback CA");
    let ca_cert = ca_params.self_signed(&ca_key).expect("self-signed ca");

    let leaf_key = KeyPair::generate().expect("leaf key");
    let leaf_params =
        CertificateParams::new(vec!["127.0.0.1".to_owned(), "localhost".to_owned()])
            .expect("leaf params");
    let leaf = leaf_params
        .signed_by(&leaf_key, &ca_cert, &ca_key)
        .expect("leaf signed by ca");

    LoopbackPki {
        ca_pem: ca_cert.pem(),
        leaf: leaf.der().clone(),
        leaf_key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
    }
}

/// Serve `HEIGHT_REPLY` over TLS to every connection; returns the base URL.
async fn spawn_tls_node(pki: &LoopbackPki) -> String {
    let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![pki.leaf.clone()], pki.leaf_key.clone_key())
        .expect("server certificate");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener must bind");
    let addr = listener.local_addr().expect("listener has address");

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // Clients that reject the certificate abort the handshake here.
                let Ok(mut tls) = acceptor.accept(socket).await else {
                    return;
                };
                let request = support::read_request(&mut tls).await;
                assert_eq!(request.json()["method"], "bcb_blockHeight");
                tls.write_all(&support::ok_response(HEIGHT_REPLY))
                    .await
                    .expect("write response");
                let _ = tls.shutdown().await;
            });
        }
    });

    format!("https://{addr}")
}

#[tokio::test(flavor = "multi_thread")]
async fn accept_any_reaches_privately_signed_node() {
    support::init_tracing();
    let pki = loopback_pki();
    let url = spawn_tls_node(&pki).await;

    let client = JsonRpcClient::new_tls(&url, None, false).expect("trust-any client must build");
    let height = client
        .block_height()
        .await
        .expect("trust-any handshake must succeed");
    assert_eq!(height, 42);
}

#[tokio::test(flavor = "multi_thread")]
async fn unrelated_ca_rejects_node() {
    support::init_tracing();
    let pki = loopback_pki();
    let url = spawn_tls_node(&pki).await;

    // The fixture CA did not sign the node's certificate.
    let unrelated_ca = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test-ca.pem");
    let client = JsonRpcClient::new_tls(&url, Some(&unrelated_ca), false)
        .expect("bundle client must build");
    let err = client
        .block_height()
        .await
        .expect_err("unrelated CA must reject the node");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test(flavor = "multi_thread")]
async fn issuing_ca_bundle_accepts_node() {
    support::init_tracing();
    let pki = loopback_pki();
    let url = spawn_tls_node(&pki).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let ca_path = dir.path().join("node-ca.pem");
    std::fs::write(&ca_path, &pki.ca_pem).expect("write ca bundle");

    let client =
        JsonRpcClient::new_tls(&url, Some(&ca_path), true).expect("bundle client must build");
    let height = client
        .block_height()
        .await
        .expect("issuing CA must verify the node");
    assert_eq!(height, 42);
}
