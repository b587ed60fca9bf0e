use std::sync::Arc;

use crate::domain::models::booking::BookingType;
use crate::domain::models::entitlement::{Entitlement, EntitlementKind};
use crate::domain::ports::EntitlementRepository;
use crate::error::AppError;

/// Tracks and consumes prepaid session allotments. Reservation picks the
/// entitlement a booking will consume; the actual decrement happens exactly
/// once, when the booking is completed or marked no-show.
pub struct EntitlementLedger {
    entitlements: Arc<dyn EntitlementRepository>,
}

impl EntitlementLedger {
    pub fn new(entitlements: Arc<dyn EntitlementRepository>) -> Self {
        Self { entitlements }
    }

    /// Validates an explicitly chosen entitlement, or selects the member's
    /// oldest ACTIVE entitlement of the matching kind (FIFO by creation
    /// time). Returns its id.
    pub async fn reserve(
        &self,
        tenant_id: &str,
        member_id: &str,
        booking_type: BookingType,
        explicit_id: Option<&str>,
    ) -> Result<String, AppError> {
        let kind = EntitlementKind::required_for(booking_type);

        if let Some(id) = explicit_id {
            let entitlement = self.entitlements.find_by_id(tenant_id, id).await?;
            return match entitlement {
                Some(e) if e.member_id == member_id && e.kind == kind && e.is_consumable() => {
                    Ok(e.id)
                }
                _ => Err(AppError::InsufficientSessions),
            };
        }

        self.entitlements
            .find_oldest_active(tenant_id, member_id, kind)
            .await?
            .map(|e| e.id)
            .ok_or(AppError::InsufficientSessions)
    }

    /// used += 1, remaining -= 1, EXHAUSTED at zero. Refuses when nothing
    /// remains; the repository guards the decrement so remaining_sessions
    /// can never go negative.
    pub async fn deduct(&self, tenant_id: &str, entitlement_id: &str) -> Result<Entitlement, AppError> {
        self.entitlements.deduct_session(tenant_id, entitlement_id).await
    }
}
