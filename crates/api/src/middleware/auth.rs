//! # Caller Identity
//!
//! Role-based access arrives as an injected caller identity, not ambient
//! global state: the fronting auth proxy authenticates the user and passes
//! `x-user-id` and `x-user-role` headers, which the [`Caller`] extractor
//! turns into a typed parameter for each handler. This service performs no
//! password or token handling of its own.

use std::str::FromStr;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use slotbook_core::errors::BookingError;
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

/// Roles recognized by the service. Scholars book slots; faculty and
/// admins additionally publish availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Scholar,
    Faculty,
    Admin,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scholar" => Ok(Role::Scholar),
            "faculty" => Ok(Role::Faculty),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Authenticated caller identity, extracted from request headers.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    /// Whether this caller may publish availability windows.
    pub fn can_publish_availability(&self) -> bool {
        matches!(self.role, Role::Faculty | Role::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "Missing x-user-id header".to_string(),
                ))
            })?;

        let id = Uuid::parse_str(id).map_err(|_| {
            AppError(BookingError::Authentication(
                "Invalid x-user-id header".to_string(),
            ))
        })?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "Missing x-user-role header".to_string(),
                ))
            })?;

        let role = role.parse().map_err(|_| {
            AppError(BookingError::Authentication(
                "Invalid x-user-role header".to_string(),
            ))
        })?;

        Ok(Caller { id, role })
    }
}
