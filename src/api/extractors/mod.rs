pub mod business;
