//! Protobuf definitions for the authentication service
//!
//! This crate provides generated gRPC code from `proto/auth.proto`.
//! Enable the `reflection` feature to export the encoded file descriptor set.

/// Authentication service proto definitions
pub mod auth {
    tonic::include_proto!("auth");
}

pub use auth::*;

/// File descriptor set for gRPC reflection
#[cfg(feature = "reflection")]
pub const FILE_DESCRIPTOR_SET: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/auth_descriptor.bin"));
