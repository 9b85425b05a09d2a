//! # Taskhive Shared Library
//!
//! This crate contains the types and business logic shared between the
//! Taskhive API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT issuance/verification, request auth context
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskhive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
