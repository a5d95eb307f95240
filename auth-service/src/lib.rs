//! Authentication Service
//!
//! Verifies username/password credentials, issues signed identity tokens,
//! and resolves tokens back to the roles of the user they name. Exposed over
//! gRPC by [`grpc::AuthenticationServiceImpl`].

pub mod config;
pub mod grpc;
pub mod models;
pub mod repository;
pub mod service;

pub use config::AuthServiceConfig;
pub use grpc::AuthenticationServiceImpl;
pub use models::User;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{AuthService, AuthenticationOutcome};
