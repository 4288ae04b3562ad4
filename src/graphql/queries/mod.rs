pub mod books;
pub mod comments;
pub mod demo;

pub use books::BookQueries;
pub use comments::CommentQueries;
pub use demo::DemoQueries;

pub(crate) mod prelude {
    pub(crate) use std::sync::Arc;

    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::graphql::context::RequestContextExt;
    pub(crate) use crate::graphql::errors::AppError;
    pub(crate) use crate::graphql::schema::SchemaOptions;
    pub(crate) use crate::graphql::types::*;
}
