/// API route handlers
///
/// - `health`: liveness and readiness endpoints
/// - `auth`: registration, login, profile
/// - `tasks`: owner-scoped task CRUD
pub mod auth;
pub mod health;
pub mod tasks;
