//! `BalanceLoad` handler
//!
//! Each stream moves through three states:
//!
//! ```text
//!   Idle ──stream opened──▶ AwaitingFirstMessage ──┬─ message ──▶ Responded
//!                                                  └─ error/EOF ─▶ Failed
//! ```
//!
//! Exactly one inbound message is read and exactly one response is sent.
//! Anything else the client streams is never looked at.

use crate::config::Config;
use crate::lb::backend::BackendDescriptor;
use crate::proto::load_balance_response::LoadBalanceResponseType;
use crate::proto::load_balancer_server::LoadBalancer;
use crate::proto::{LoadBalanceRequest, LoadBalanceResponse, ServerList};
use tokio_stream::Once;
use tonic::{Request, Response, Status, Streaming};
use tracing::{error, info};

/// Balancer that always points clients at `127.0.0.1:<backend_port>`.
#[derive(Debug, Clone)]
pub struct FakeLoadBalancer {
    backend_port: u16,
}

impl FakeLoadBalancer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            backend_port: cfg.backend_port,
        }
    }

    pub fn backend_port(&self) -> u16 {
        self.backend_port
    }

    /// The one response every successful stream receives.
    pub fn response(&self) -> LoadBalanceResponse {
        let backend = BackendDescriptor::loopback(self.backend_port);

        LoadBalanceResponse {
            load_balance_response_type: Some(LoadBalanceResponseType::ServerList(ServerList {
                servers: vec![backend.into()],
            })),
        }
    }
}

#[tonic::async_trait]
impl LoadBalancer for FakeLoadBalancer {
    type BalanceLoadStream = Once<Result<LoadBalanceResponse, Status>>;

    async fn balance_load(
        &self,
        request: Request<Streaming<LoadBalanceRequest>>,
    ) -> Result<Response<Self::BalanceLoadStream>, Status> {
        let peer = request.remote_addr();
        info!(?peer, "Begin handling new BalanceLoad request");

        let mut inbound = request.into_inner();
        match inbound.message().await {
            Ok(Some(_)) => {}
            Ok(None) => {
                error!(?peer, "Error receiving LoadBalanceRequest: EOF");
                return Err(Status::unknown(
                    "EOF: stream closed before a LoadBalanceRequest was received",
                ));
            }
            Err(status) => {
                error!(?peer, error = %status, "Error receiving LoadBalanceRequest");
                return Err(status);
            }
        }
        info!(?peer, "LoadBalanceRequest received");

        // The inbound half is dropped unread from here on.
        drop(inbound);

        let response = self.response();
        info!(?peer, backend_port = self.backend_port(), "Sending LoadBalanceResponse");

        Ok(Response::new(tokio_stream::once(Ok(response))))
    }
}
