use tracing::debug;

use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// All books in the catalogue
    async fn books(&self) -> Option<Vec<Option<Book>>> {
        Some(all_books().iter().cloned().map(Some).collect())
    }

    /// Books whose title matches exactly (case-sensitive)
    async fn books_title(&self, ctx: &Context<'_>, title: String) -> Result<Option<Vec<Option<Book>>>> {
        let request = ctx.request_context()?;
        debug!(auth_scope = %request.auth_scope, title = %title, "booksTitle context");

        Ok(Some(books_by_title(&title).into_iter().map(Some).collect()))
    }
}
