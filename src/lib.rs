//! Bookshelf - a small GraphQL server over a static book catalogue
//!
//! Serves queries, one mutation, and a `newMessage` subscription fed by a
//! periodic server timestamp. The binary in `main.rs` wires the services
//! together; everything here is usable from tests.

pub mod api;
pub mod app;
pub mod config;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
pub use config::Config;
