/// TaskHive REST API
///
/// HTTP surface for the TaskHive task manager: registration, login, and
/// owner-scoped task CRUD over a PostgreSQL store. Handlers, routing,
/// configuration, and the error-to-response mapping live here; models,
/// credentials, and token plumbing live in `taskhive-shared`.
pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
