pub mod appointment;
pub mod business;
pub mod lead;
pub mod offer;
