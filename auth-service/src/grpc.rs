//! gRPC service implementation
//!
//! Adapts [`AuthService`] to the generated `AuthenticationService` trait and
//! maps failures onto gRPC statuses.

use error::{AuthenticationError, AuthorizationError};
use tonic::metadata::MetadataValue;
use tonic::{Code, Request, Response, Status};

use proto::authentication_service_server::AuthenticationService;
use proto::{
    AuthenticationRequest, AuthenticationResponse, AuthenticationStatus, AuthorizationRequest,
    AuthorizationResponse,
};

use crate::service::{AuthService, AuthenticationOutcome};

/// Metadata key carrying the machine-readable error code.
pub const ERROR_CODE_METADATA: &str = "x-error-code";

/// gRPC front for the authentication service
pub struct AuthenticationServiceImpl {
    service: AuthService,
}

impl AuthenticationServiceImpl {
    pub fn new(service: AuthService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthenticationService for AuthenticationServiceImpl {
    async fn authenticate(
        &self,
        request: Request<AuthenticationRequest>,
    ) -> Result<Response<AuthenticationResponse>, Status> {
        let req = request.into_inner();

        let response = match self.service.authenticate(&req.username, &req.password).await {
            Ok(AuthenticationOutcome::Authenticated { token }) => AuthenticationResponse {
                status: AuthenticationStatus::Authenticated as i32,
                token: Some(token),
            },
            Ok(AuthenticationOutcome::NotAuthenticated) => AuthenticationResponse {
                status: AuthenticationStatus::NotAuthenticated as i32,
                token: None,
            },
            Err(e) => return Err(authentication_status(&e)),
        };

        Ok(Response::new(response))
    }

    async fn authorize(
        &self,
        request: Request<AuthorizationRequest>,
    ) -> Result<Response<AuthorizationResponse>, Status> {
        let req = request.into_inner();

        match self.service.authorize(&req.token).await {
            Ok(roles) => Ok(Response::new(AuthorizationResponse { roles })),
            Err(e) => Err(authorization_status(&e)),
        }
    }
}

fn authentication_status(err: &AuthenticationError) -> Status {
    let code = match err {
        AuthenticationError::Repository(_) => Code::Unavailable,
        AuthenticationError::Signing(_) => Code::Internal,
    };
    tracing::error!("Authenticate failed: {}", err);
    with_error_code(Status::new(code, err.to_string()), err.code())
}

fn authorization_status(err: &AuthorizationError) -> Status {
    let code = match err {
        AuthorizationError::Verification(_) => Code::Unauthenticated,
        AuthorizationError::IdentityNotFound(_) => Code::NotFound,
        AuthorizationError::Repository(_) => Code::Unavailable,
    };
    with_error_code(Status::new(code, err.to_string()), err.code())
}

fn with_error_code(mut status: Status, error_code: &'static str) -> Status {
    status
        .metadata_mut()
        .insert(ERROR_CODE_METADATA, MetadataValue::from_static(error_code));
    status
}
