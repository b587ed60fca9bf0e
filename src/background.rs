use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Hourly sweep that expires entitlements whose expiry_date has passed.
/// Expiry is lazy; bookings against an expired entitlement are already
/// refused by the guarded deduct, this just makes the status visible.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Background worker started (entitlement expiry sweep)");

    loop {
        if let Err(e) = sweep_expired_entitlements(&state).await {
            error!("Entitlement expiry sweep failed: {:?}", e);
        }
        tokio::time::sleep(SWEEP_INTERVAL).await;
    }
}

async fn sweep_expired_entitlements(state: &AppState) -> Result<(), crate::error::AppError> {
    let today = Utc::now().date_naive();
    let expired = state.entitlement_repo.find_expired_active(today).await?;

    if expired.is_empty() {
        return Ok(());
    }

    info!("Expiring {} entitlement(s)", expired.len());
    for entitlement in expired {
        state
            .entitlement_repo
            .mark_expired(&entitlement.tenant_id, &entitlement.id)
            .await?;
    }
    Ok(())
}
