/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Local authentication (register, login)
/// - `oauth`: Federated sign-in (Google, GitHub)
/// - `dashboard`: The caller's own profile
/// - `entities`: Scoped entity CRUD with search/filter/sort

pub mod auth;
pub mod dashboard;
pub mod entities;
pub mod health;
pub mod oauth;
