pub mod availability;
pub mod booking;
pub mod calendar;
pub mod entitlement;
pub mod health;
pub mod settings;
