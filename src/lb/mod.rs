//! Fake look-aside load balancer
//!
//! The balancer answers every `BalanceLoad` stream with a single server list
//! pointing at one loopback backend.

pub mod backend;
pub mod service;

pub use backend::BackendDescriptor;
pub use service::FakeLoadBalancer;
