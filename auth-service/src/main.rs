use std::sync::Arc;

use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::TokenCodec;
use auth_service::{
    AuthService, AuthServiceConfig, AuthenticationServiceImpl, InMemoryUserRepository,
};
use proto::authentication_service_server::AuthenticationServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AuthServiceConfig::from_env();
    tracing::info!("Starting Authentication Service v{}", config.version);

    // Signing key problems stop startup here
    let codec = TokenCodec::new(&config.jwt_config()?)?;
    tracing::info!(
        "Issuing {} tokens as {}",
        codec.algorithm(),
        codec.issuer()
    );

    let repository = match &config.users_file {
        Some(path) => InMemoryUserRepository::from_json_file(path)?,
        None => {
            tracing::warn!("USERS_FILE not set, starting with an empty credential store");
            InMemoryUserRepository::new()
        }
    };
    tracing::info!("Loaded {} user records", repository.len());

    let service = AuthService::new(Arc::new(repository), Arc::new(codec));

    // Parse address
    let addr = config.grpc_addr.parse()?;

    // Create reflection service
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    tracing::info!("gRPC server listening on {}", config.grpc_addr);

    Server::builder()
        .add_service(reflection_service)
        .add_service(AuthenticationServiceServer::new(
            AuthenticationServiceImpl::new(service),
        ))
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
