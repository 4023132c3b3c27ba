//! Linkforge - short link creation service
//!
//! A single `POST /create` endpoint validates a target url and an optional
//! custom slug, deduplicates against existing records and persists new links.
//!
//! # Architecture
//! - `api`: HTTP handlers and middleware
//! - `services`: link creation logic
//! - `storage`: repository trait and SeaORM backend
//! - `config`: TOML + environment configuration
//! - `runtime`: server lifecycle
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
