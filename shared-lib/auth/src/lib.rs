//! Token issuance and verification for the authentication service.
//!
//! [`TokenCodec`] is the only place that touches the signing key. It signs
//! identity claims into compact JWTs and verifies them back.

mod claims;
mod token;

pub use claims::Claims;
pub use token::{Algorithm, JwtConfig, TokenCodec};
