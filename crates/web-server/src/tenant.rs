use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use core_types::TenantId;

/// The header every tenant-scoped request must carry.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Extracts the calling tenant from the `X-Tenant-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct Tenant(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or_else(|| AppError::Tenant("Missing X-Tenant-Id header".to_string()))?;

        let text = value
            .to_str()
            .map_err(|_| AppError::Tenant("X-Tenant-Id header is not valid text".to_string()))?;

        text.parse::<TenantId>()
            .map(Tenant)
            .map_err(|e| AppError::Tenant(format!("X-Tenant-Id header is not a UUID: {e}")))
    }
}
