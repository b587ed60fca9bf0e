pub mod postgres_availability_repo;
pub mod postgres_booking_repo;
pub mod postgres_entitlement_repo;
pub mod postgres_override_repo;
pub mod postgres_settings_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_entitlement_repo;
pub mod sqlite_override_repo;
pub mod sqlite_settings_repo;
