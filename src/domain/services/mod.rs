pub mod availability;
pub mod business_hours;
pub mod cancellation_service;
pub mod conflict_guard;
pub mod matching;
pub mod scheduling_service;
