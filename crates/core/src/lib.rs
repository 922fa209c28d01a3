//! Core business logic for the coterie admin service.

pub mod services;

pub use services::*;
