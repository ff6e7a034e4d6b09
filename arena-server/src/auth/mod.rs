//! Staff Identity
//!
//! 场馆内网部署，调用方身份由网关保证 — 这里只提取，不验证会话。
//! Staff identity rides on `X-Staff-Id` / `X-Staff-Name` headers;
//! administrative endpoints additionally require `X-Admin-Token` to
//! match the configured token.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::ServerState;
use crate::utils::AppError;

pub const STAFF_ID_HEADER: &str = "x-staff-id";
pub const STAFF_NAME_HEADER: &str = "x-staff-name";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// The staff member performing the request
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    pub id: i64,
    pub display_name: String,
}

impl FromRequestParts<ServerState> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted
        if let Some(staff) = parts.extensions.get::<CurrentStaff>() {
            return Ok(staff.clone());
        }

        let id_header = parts
            .headers
            .get(STAFF_ID_HEADER)
            .and_then(|h| h.to_str().ok());

        let id: i64 = match id_header {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::validation(format!("Malformed {STAFF_ID_HEADER} header: {raw}"))
            })?,
            None => {
                tracing::warn!(target: "auth", uri = %parts.uri, "request without staff identity");
                return Err(AppError::Unauthorized);
            }
        };

        let display_name = parts
            .headers
            .get(STAFF_NAME_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Staff {id}"));

        let staff = CurrentStaff { id, display_name };
        parts.extensions.insert(staff.clone());
        Ok(staff)
    }
}

/// Marker extractor for admin-only endpoints (expire-day, raffle draw).
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

impl FromRequestParts<ServerState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state.config.admin_token.as_deref().ok_or_else(|| {
            AppError::Forbidden("Admin endpoints are disabled (no ADMIN_TOKEN configured)".into())
        })?;

        let supplied = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok());

        match supplied {
            Some(token) if token == expected => Ok(AdminGuard),
            _ => {
                tracing::warn!(target: "auth", uri = %parts.uri, "admin token missing or wrong");
                Err(AppError::Forbidden("Admin token required".into()))
            }
        }
    }
}
