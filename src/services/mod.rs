//! Service layer for business logic
//!
//! HTTP handlers stay thin and delegate here.

mod link_service;

pub use link_service::*;
