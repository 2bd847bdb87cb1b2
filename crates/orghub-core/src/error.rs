//! Unified application error types for OrgHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] carries the
//! stable, machine-readable code that clients see.

use std::fmt;
use thiserror::Error;

/// Error taxonomy used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The request carried no session credential at all.
    NoCredential,
    /// A credential was presented but the identity provider rejected it.
    InvalidCredential,
    /// The identity provider (or authorization server) could not be reached in time.
    ProviderUnreachable,
    /// The caller is not a member of the organization.
    ForbiddenNotMember,
    /// The caller is not an admin of the organization.
    ForbiddenNotAdmin,
    /// The caller is not the owner of the organization.
    ForbiddenNotOwner,
    /// The owner cannot be removed from their organization.
    ForbiddenOwnerRemoval,
    /// The owner cannot be demoted except by naming a successor.
    ForbiddenOwnerDemotion,
    /// The caller is not allowed to create organizations.
    ForbiddenOrganizationCreation,
    /// No user matched the lookup.
    UserNotFound,
    /// The organization does not exist.
    OrganizationNotFound,
    /// The user is not a member of the organization being modified.
    MemberNotFound,
    /// Some other resource was not found.
    NotFound,
    /// A role string was not one of `member`, `admin`, `owner`.
    InvalidRole,
    /// An organization type was not one of the known types.
    InvalidOrgType,
    /// Input validation failed.
    Validation,
    /// The user is already a member and re-invites are rejected.
    AlreadyMember,
    /// A uniqueness conflict occurred.
    Conflict,
    /// A database error occurred.
    StorageFailure,
    /// An upstream service answered with an unexpected response.
    ExternalService,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoCredential => "NO_CREDENTIAL",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::ProviderUnreachable => "PROVIDER_UNREACHABLE",
            Self::ForbiddenNotMember => "FORBIDDEN_NOT_MEMBER",
            Self::ForbiddenNotAdmin => "FORBIDDEN_NOT_ADMIN",
            Self::ForbiddenNotOwner => "FORBIDDEN_NOT_OWNER",
            Self::ForbiddenOwnerRemoval => "FORBIDDEN_OWNER_REMOVAL",
            Self::ForbiddenOwnerDemotion => "FORBIDDEN_OWNER_DEMOTION",
            Self::ForbiddenOrganizationCreation => "FORBIDDEN_ORGANIZATION_CREATION",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
            Self::MemberNotFound => "MEMBER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidOrgType => "INVALID_ORG_TYPE",
            Self::Validation => "VALIDATION_ERROR",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::Conflict => "CONFLICT",
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::ExternalService => "EXTERNAL_SERVICE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Whether this kind is one of the `Forbidden*` authorization failures.
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::ForbiddenNotMember
                | Self::ForbiddenNotAdmin
                | Self::ForbiddenNotOwner
                | Self::ForbiddenOwnerRemoval
                | Self::ForbiddenOwnerDemotion
                | Self::ForbiddenOrganizationCreation
        )
    }

    /// Whether this kind is a server-side failure whose detail must not
    /// reach the client.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnreachable
                | Self::StorageFailure
                | Self::ExternalService
                | Self::Configuration
                | Self::Serialization
                | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout OrgHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a no-credential error.
    pub fn no_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoCredential, message)
    }

    /// Create an invalid-credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// Create a provider-unreachable error.
    pub fn provider_unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderUnreachable, message)
    }

    /// Create a user-not-found error.
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserNotFound, message)
    }

    /// Create an organization-not-found error.
    pub fn organization_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OrganizationNotFound, message)
    }

    /// Create a member-not-found error.
    pub fn member_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MemberNotFound, message)
    }

    /// Create a generic not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a storage failure from a database error.
    pub fn storage(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(ErrorKind::StorageFailure, message, source)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
