//! Authoritative book collection mirrored to a JSON document.
//!
//! Every mutation works on a copy of the collection, rewrites the document,
//! and only then swaps the copy in. A failed write therefore leaves both the
//! file and the in-memory collection as they were.

use std::path::Path;

use bookshelf_db::JsonFile;
use uuid::Uuid;

use super::error::{BookError, BookResult};
use super::models::Book;

pub struct BookStore {
    file: JsonFile<Book>,
    books: Vec<Book>,
}

impl BookStore {
    /// Open the collection document, creating an empty one if missing.
    pub fn open(path: impl AsRef<Path>) -> BookResult<Self> {
        let file = JsonFile::open(path.as_ref())?;
        let books = file.load()?;

        tracing::info!(
            path = %file.path().display(),
            count = books.len(),
            "book store loaded"
        );
        Ok(Self { file, books })
    }

    /// Append `book` and persist. Ids must be unique.
    pub fn add(&mut self, book: Book) -> BookResult<Uuid> {
        if self.position(book.id).is_some() {
            return Err(BookError::DuplicateId(book.id));
        }

        let id = book.id;
        let mut next = self.books.clone();
        next.push(book);
        self.commit(next)?;

        tracing::debug!(book_id = %id, "book added");
        Ok(id)
    }

    pub fn get(&self, id: Uuid) -> BookResult<&Book> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or(BookError::NotFound(id))
    }

    /// Replace the stored book with the same id, keeping its position.
    pub fn update(&mut self, book: Book) -> BookResult<()> {
        let index = self.position(book.id).ok_or(BookError::NotFound(book.id))?;

        let id = book.id;
        let mut next = self.books.clone();
        next[index] = book;
        self.commit(next)?;

        tracing::debug!(book_id = %id, "book updated");
        Ok(())
    }

    /// Remove the book with `id`, returning it.
    pub fn delete(&mut self, id: Uuid) -> BookResult<Book> {
        let index = self.position(id).ok_or(BookError::NotFound(id))?;

        let mut next = self.books.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        tracing::debug!(book_id = %id, "book deleted");
        Ok(removed)
    }

    /// Every stored book in insertion order.
    pub fn all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    fn commit(&mut self, next: Vec<Book>) -> BookResult<()> {
        self.file.save(&next)?;
        self.books = next;
        Ok(())
    }
}
