//! GraphQL object types and the static catalogue they are served from.

use async_graphql::{Object, SimpleObject};
use once_cell::sync::Lazy;

use super::scalars::{Date, DateRepr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

#[Object]
impl Book {
    async fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    async fn author(&self) -> Option<&str> {
        Some(&self.author)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i32,
    pub create_date: Date,
}

#[Object]
impl Comment {
    async fn id(&self) -> Option<i32> {
        Some(self.id)
    }

    async fn create_date(&self) -> Option<&Date> {
        Some(&self.create_date)
    }
}

/// Declared for schema compatibility; no field returns it.
#[derive(Debug, Clone, Default, SimpleObject)]
pub struct Post {
    pub author: Option<String>,
    pub comment: Option<String>,
}

static BOOKS: Lazy<Vec<Book>> = Lazy::new(|| {
    vec![
        Book::new("Harry Potter and the Chamber of Secrets", "J.K. Rowling"),
        Book::new("Jurassic Park", "Michael Crichton"),
    ]
});

static COMMENT: Lazy<Comment> = Lazy::new(|| Comment {
    id: 1,
    create_date: Date::from(DateRepr::Text("1546300800000".to_string())),
});

/// All books, in seed order.
pub fn all_books() -> &'static [Book] {
    &BOOKS
}

/// Books whose title equals `title` exactly.
pub fn books_by_title(title: &str) -> Vec<Book> {
    BOOKS.iter().filter(|b| b.title == title).cloned().collect()
}

/// The single demo comment.
pub fn demo_comment() -> &'static Comment {
    &COMMENT
}
