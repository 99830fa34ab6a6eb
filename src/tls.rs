//! TLS configuration for calls to the game API.
//!
//! Builds a [`rustls::ClientConfig`] trusting the Mozilla root store
//! bundled by `webpki-roots`, so the service does not depend on the
//! certificates installed in its container image.

use rustls::{ClientConfig, RootCertStore};

/// Builds a [`ClientConfig`] whose root store contains the bundled
/// Mozilla CA certificates.
pub fn build_tls_config() -> ClientConfig {
    ClientConfig::builder()
        .with_root_certificates(root_store())
        .with_no_client_auth()
}

fn root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    root_store
}
