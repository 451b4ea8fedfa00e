//! Transport security strategies
//!
//! The strategy is picked once from [`Config`](crate::config::Config) and
//! applied to the server builder before any connection is accepted.

use anyhow::{Context, Result};
use std::path::Path;
use tonic::transport::{Certificate, Identity, Server, ServerTlsConfig};
use tracing::{info, warn};

use crate::config::{TlsPaths, TransportSecurity};

impl TransportSecurity {
    /// Apply this strategy to a fresh server builder.
    pub fn configure(&self, server: Server) -> Result<Server> {
        match self {
            TransportSecurity::Insecure => {
                warn!("Serving with insecure credentials (plaintext HTTP/2)");
                Ok(server)
            }
            TransportSecurity::MutualTls(paths) => {
                let tls = paths.server_tls_config()?;
                info!(
                    cert = %paths.cert.display(),
                    client_ca = %paths.client_ca.display(),
                    "Serving with mutual TLS credentials"
                );
                server
                    .tls_config(tls)
                    .context("failed to apply TLS configuration")
            }
        }
    }
}

impl TlsPaths {
    /// Load the PEM files and build a TLS config that requires client
    /// certificates signed by `client_ca`.
    pub fn server_tls_config(&self) -> Result<ServerTlsConfig> {
        let cert = read_pem(&self.cert, "server certificate")?;
        let key = read_pem(&self.key, "server private key")?;
        let client_ca = read_pem(&self.client_ca, "client CA bundle")?;

        Ok(ServerTlsConfig::new()
            .identity(Identity::from_pem(cert, key))
            .client_ca_root(Certificate::from_pem(client_ca)))
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {} from {}", what, path.display()))
}
