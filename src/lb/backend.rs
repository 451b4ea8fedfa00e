//! Backend descriptors handed out by the balancer
//!
//! A descriptor is built fresh for every response and converted straight into
//! the wire `Server` message; nothing is kept between streams.

use crate::proto::Server;
use std::net::Ipv4Addr;

/// One backend a client should connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendDescriptor {
    /// Backend IPv4 address
    pub ip: Ipv4Addr,

    /// Backend port
    pub port: u16,
}

impl BackendDescriptor {
    /// Descriptor for a backend on 127.0.0.1.
    pub fn loopback(port: u16) -> Self {
        Self {
            ip: Ipv4Addr::LOCALHOST,
            port,
        }
    }

    /// Address bytes in network order, e.g. `[127, 0, 0, 1]`.
    pub fn ip_bytes(&self) -> [u8; 4] {
        self.ip.octets()
    }
}

impl From<BackendDescriptor> for Server {
    fn from(backend: BackendDescriptor) -> Self {
        Server {
            ip_address: backend.ip_bytes().to_vec(),
            port: i32::from(backend.port),
            load_balance_token: String::new(),
            drop: false,
        }
    }
}
