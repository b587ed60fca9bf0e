pub mod availability;
pub mod booking_lifecycle;
pub mod calendar;
pub mod conflict;
pub mod entitlement_ledger;
pub mod window_algebra;
