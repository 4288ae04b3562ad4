use tracing::debug;

use super::prelude::*;
use crate::graphql::scalars::Date;

#[derive(Default)]
pub struct CommentQueries;

#[Object]
impl CommentQueries {
    /// Demo comment. `title` is coerced as a `Date` before this runs and is otherwise unused.
    async fn scalar_books(&self, title: Date) -> Option<Comment> {
        debug!(title = ?title, "scalarBooks argument");
        Some(demo_comment().clone())
    }
}
