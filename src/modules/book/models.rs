use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A book as stored in the collection document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned once and never changed
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub pages: i32,
    pub rating: f64,
    pub number_of_copies_sold: i64,
    /// Publication year, e.g. `1999`
    pub published_date: i32,
}

/// A book as exchanged with API callers. `id` may be omitted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    pub author: String,
    pub pages: i32,
    pub rating: f64,
    pub number_of_copies_sold: i64,
    pub published_date: i32,
}

impl From<BookDto> for Book {
    /// Generates a fresh time-ordered id when the caller did not supply one.
    fn from(dto: BookDto) -> Self {
        Book {
            id: dto.id.unwrap_or_else(Uuid::now_v7),
            title: dto.title,
            author: dto.author,
            pages: dto.pages,
            rating: dto.rating,
            number_of_copies_sold: dto.number_of_copies_sold,
            published_date: dto.published_date,
        }
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        BookDto {
            id: Some(book.id),
            title: book.title,
            author: book.author,
            pages: book.pages,
            rating: book.rating,
            number_of_copies_sold: book.number_of_copies_sold,
            published_date: book.published_date,
        }
    }
}
