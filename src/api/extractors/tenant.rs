use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

/// Pulls the tenant id out of the path. Tenants are provisioned out of
/// band; an unknown id simply scopes queries to an empty data set.
pub struct TenantId(pub String);

impl FromRequestParts<Arc<AppState>> for TenantId {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        let tenant_id = params.get("tenant_id").ok_or(StatusCode::BAD_REQUEST)?;
        if tenant_id.trim().is_empty() {
            return Err(StatusCode::BAD_REQUEST);
        }

        Ok(TenantId(tenant_id.clone()))
    }
}
