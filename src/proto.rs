//! Generated grpclb v1 messages and service glue.

pub mod grpc_lb_v1 {
    tonic::include_proto!("grpc.lb.v1");
}

pub use grpc_lb_v1::*;
