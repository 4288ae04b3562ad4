pub mod demo;

pub use demo::DemoMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{ErrorExtensions, MaybeUndefined, Object, Result};

    pub(crate) use crate::graphql::errors::AppError;
}
