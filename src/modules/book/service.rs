use std::path::Path;

use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{BookError, BookResult};
use super::models::{Book, BookDto};
use super::query;
use super::store::BookStore;

/// Supplies the year used by [`BookService::get_recent_books`].
pub type YearSource = fn() -> i32;

fn current_utc_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Entry point for the HTTP handlers and the CLI.
///
/// Mutations hold the write lock across the whole read-modify-persist cycle,
/// so concurrent requests in one process never lose updates. Reads copy a
/// snapshot under the read lock and query it after the lock is released.
pub struct BookService {
    store: RwLock<BookStore>,
    current_year: YearSource,
}

impl BookService {
    pub fn new(store: BookStore) -> Self {
        Self::with_year_source(store, current_utc_year)
    }

    pub fn with_year_source(store: BookStore, current_year: YearSource) -> Self {
        Self {
            store: RwLock::new(store),
            current_year,
        }
    }

    /// Open the store at `path` and wrap it.
    pub fn open(path: impl AsRef<Path>) -> BookResult<Self> {
        Ok(Self::new(BookStore::open(path)?))
    }

    async fn snapshot(&self) -> Vec<Book> {
        self.store.read().await.all().to_vec()
    }

    fn to_dtos(books: Vec<Book>) -> Vec<BookDto> {
        books.into_iter().map(BookDto::from).collect()
    }

    pub async fn add_book(&self, dto: BookDto) -> BookResult<Uuid> {
        let book = Book::from(dto);
        self.store.write().await.add(book)
    }

    pub async fn get_book(&self, id: Uuid) -> BookResult<BookDto> {
        let store = self.store.read().await;
        store.get(id).cloned().map(BookDto::from)
    }

    /// Replace a stored book wholesale. The body must carry the id.
    pub async fn update_book(&self, dto: BookDto) -> BookResult<()> {
        if dto.id.is_none() {
            return Err(BookError::MissingId);
        }
        self.store.write().await.update(Book::from(dto))
    }

    pub async fn delete_book(&self, id: Uuid) -> BookResult<()> {
        self.store.write().await.delete(id).map(|_| ())
    }

    pub async fn get_all_books(&self) -> Vec<BookDto> {
        Self::to_dtos(query::all(&self.snapshot().await))
    }

    pub async fn get_all_books_by_author(&self, author: &str) -> Vec<BookDto> {
        Self::to_dtos(query::by_author(&self.snapshot().await, author))
    }

    pub async fn search_books_by_title(&self, keyword: &str) -> Vec<BookDto> {
        Self::to_dtos(query::search_by_title(&self.snapshot().await, keyword))
    }

    pub async fn get_books_published_after_year(&self, year: i32) -> Vec<BookDto> {
        Self::to_dtos(query::published_after_year(&self.snapshot().await, year))
    }

    pub async fn get_recent_books(&self, years: i32) -> Vec<BookDto> {
        let current_year = (self.current_year)();
        Self::to_dtos(query::recent_books(
            &self.snapshot().await,
            years,
            current_year,
        ))
    }

    pub async fn get_books_within_page_range(
        &self,
        min_pages: i32,
        max_pages: i32,
    ) -> Vec<BookDto> {
        Self::to_dtos(query::within_page_range(
            &self.snapshot().await,
            min_pages,
            max_pages,
        ))
    }

    pub async fn get_books_sorted_by_rating(&self) -> Vec<BookDto> {
        Self::to_dtos(query::sorted_by_rating(&self.snapshot().await))
    }

    pub async fn get_top_rated_book(&self) -> BookResult<BookDto> {
        query::top_rated(&self.snapshot().await).map(BookDto::from)
    }

    pub async fn get_most_popular_book(&self) -> BookResult<BookDto> {
        query::most_popular(&self.snapshot().await).map(BookDto::from)
    }

    /// See [`query::total_copies_sold_by_author`]: the answer is a maximum.
    pub async fn get_total_copies_sold_by_author(&self, author: &str) -> BookResult<i64> {
        query::total_copies_sold_by_author(&self.snapshot().await, author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn dto(title: &str, author: &str, rating: f64, published: i32) -> BookDto {
        BookDto {
            id: None,
            title: title.into(),
            author: author.into(),
            pages: 300,
            rating,
            number_of_copies_sold: 10,
            published_date: published,
        }
    }

    fn service(tmp: &TempDir) -> BookService {
        let store = BookStore::open(tmp.path().join("Book.json")).unwrap();
        BookService::with_year_source(store, || 2026)
    }

    #[tokio::test]
    async fn add_then_get_returns_equal_record() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);
        let input = dto("Dune", "Frank Herbert", 4.6, 1965);

        let id = service.add_book(input.clone()).await.unwrap();
        let stored = service.get_book(id).await.unwrap();

        assert_eq!(stored, BookDto { id: Some(id), ..input });
    }

    #[tokio::test]
    async fn reads_are_idempotent() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);
        service.add_book(dto("A", "x", 1.0, 2000)).await.unwrap();
        service.add_book(dto("B", "y", 2.0, 2001)).await.unwrap();

        assert_eq!(service.get_all_books().await, service.get_all_books().await);
    }

    #[tokio::test]
    async fn update_requires_id() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);

        let err = service
            .update_book(dto("Dune", "Frank Herbert", 4.6, 1965))
            .await
            .unwrap_err();
        assert!(matches!(err, BookError::MissingId));
    }

    #[tokio::test]
    async fn update_replaces_whole_record() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);
        let id = service
            .add_book(dto("Dune", "Frank Herbert", 4.6, 1965))
            .await
            .unwrap();

        let replacement = BookDto {
            id: Some(id),
            ..dto("Dune (Revised)", "F. Herbert", 4.8, 1966)
        };
        service.update_book(replacement.clone()).await.unwrap();

        assert_eq!(service.get_book(id).await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);
        let id = service.add_book(dto("A", "x", 1.0, 2000)).await.unwrap();

        service.delete_book(id).await.unwrap();

        assert!(matches!(
            service.get_book(id).await,
            Err(BookError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn recent_books_uses_year_source() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);
        service.add_book(dto("Old", "x", 1.0, 2015)).await.unwrap();
        service.add_book(dto("New", "y", 1.0, 2024)).await.unwrap();

        let recent = service.get_recent_books(2).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "New");
    }

    #[tokio::test]
    async fn aggregates_fail_on_empty_storage() {
        let tmp = TempDir::new().unwrap();
        let service = service(&tmp);

        assert!(matches!(
            service.get_top_rated_book().await,
            Err(BookError::EmptyCollection)
        ));
        assert!(matches!(
            service.get_most_popular_book().await,
            Err(BookError::EmptyCollection)
        ));
        assert!(matches!(
            service.get_total_copies_sold_by_author("Anyone").await,
            Err(BookError::NoMatch(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_adds_are_all_persisted() {
        let tmp = TempDir::new().unwrap();
        let service = Arc::new(service(&tmp));

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .add_book(dto(&format!("Book {i}"), "Author", 3.0, 2000))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(service.get_all_books().await.len(), 16);
        let reopened = BookStore::open(tmp.path().join("Book.json")).unwrap();
        assert_eq!(reopened.len(), 16);
    }
}
