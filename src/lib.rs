//! fake-grpclb - Fake look-aside load balancer
//!
//! Serves `grpc.lb.v1.LoadBalancer/BalanceLoad` and always answers with a
//! single loopback backend. Meant for exercising gRPC client load balancing
//! in test harnesses.

pub mod config;
pub mod lb;
pub mod proto;
pub mod server;
