//! API route definitions
//!
//! The primary API is GraphQL at /graphql. The only REST endpoints are
//! liveness and readiness checks.

pub mod health;
