use std::future::Future;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use crate::config::Config;
use crate::lb::FakeLoadBalancer;
use crate::proto::load_balancer_server::LoadBalancerServer;

/// Bind the configured port and serve until the process is stopped.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        port = cfg.port,
        backend_port = cfg.backend_port,
        insecure = cfg.is_insecure(),
        "Begin listening on {}",
        addr
    );

    serve(listener, cfg, std::future::pending()).await
}

/// Serve `BalanceLoad` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, cfg: &Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let mut server = cfg.security.configure(Server::builder())?;
    let balancer = FakeLoadBalancer::new(cfg);

    server
        .add_service(LoadBalancerServer::new(balancer))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .context("load balancer server failed")?;

    Ok(())
}
