//! HTTP handlers for the book module, mounted under `/api/book`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use bookshelf_http::{ApiQuery, AppError};
use serde::Deserialize;
use uuid::Uuid;

use super::models::BookDto;
use super::service::BookService;

type SharedService = State<Arc<BookService>>;

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AuthorParams {
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordParams {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct YearsParams {
    pub years: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRangeParams {
    pub min_pages: i32,
    pub max_pages: i32,
}

/// Router exposing every book operation; paths are relative to the module mount.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/addBook", post(add_book))
        .route("/deleteBook", delete(delete_book))
        .route("/updateBook", put(update_book))
        .route("/getBookById", get(get_book_by_id))
        .route("/getAllBooks", get(get_all_books))
        .route("/getAllBooksByAuthor", get(get_all_books_by_author))
        .route("/getTopRatedBook", get(get_top_rated_book))
        .route("/getBooksPublishedAfterYear", get(get_books_published_after_year))
        .route("/getMostPopularBook", get(get_most_popular_book))
        .route("/searchBooksByTitle", get(search_books_by_title))
        .route("/getBooksWithinPageRange", get(get_books_within_page_range))
        .route("/getTotalCopiesSoldByAuthor", get(get_total_copies_sold_by_author))
        .route("/getBooksSortedByRating", get(get_books_sorted_by_rating))
        .route("/getRecentBooks", get(get_recent_books))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "book module is healthy"
}

async fn add_book(
    State(service): SharedService,
    Json(book): Json<BookDto>,
) -> Result<Json<Uuid>, AppError> {
    let id = service.add_book(book).await?;
    tracing::info!(book_id = %id, "book added");
    Ok(Json(id))
}

async fn delete_book(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<IdParams>,
) -> Result<StatusCode, AppError> {
    service.delete_book(params.id).await?;
    tracing::info!(book_id = %params.id, "book deleted");
    Ok(StatusCode::OK)
}

async fn update_book(
    State(service): SharedService,
    Json(book): Json<BookDto>,
) -> Result<StatusCode, AppError> {
    let id = book.id;
    service.update_book(book).await?;
    tracing::info!(book_id = ?id, "book updated");
    Ok(StatusCode::OK)
}

async fn get_book_by_id(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<IdParams>,
) -> Result<Json<BookDto>, AppError> {
    Ok(Json(service.get_book(params.id).await?))
}

async fn get_all_books(State(service): SharedService) -> Json<Vec<BookDto>> {
    Json(service.get_all_books().await)
}

async fn get_all_books_by_author(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<AuthorParams>,
) -> Json<Vec<BookDto>> {
    Json(service.get_all_books_by_author(&params.author).await)
}

async fn get_top_rated_book(State(service): SharedService) -> Result<Json<BookDto>, AppError> {
    Ok(Json(service.get_top_rated_book().await?))
}

async fn get_books_published_after_year(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<YearParams>,
) -> Json<Vec<BookDto>> {
    Json(service.get_books_published_after_year(params.year).await)
}

async fn get_most_popular_book(
    State(service): SharedService,
) -> Result<Json<BookDto>, AppError> {
    Ok(Json(service.get_most_popular_book().await?))
}

async fn search_books_by_title(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<KeywordParams>,
) -> Json<Vec<BookDto>> {
    Json(service.search_books_by_title(&params.keyword).await)
}

async fn get_books_within_page_range(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<PageRangeParams>,
) -> Json<Vec<BookDto>> {
    Json(
        service
            .get_books_within_page_range(params.min_pages, params.max_pages)
            .await,
    )
}

async fn get_total_copies_sold_by_author(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<AuthorParams>,
) -> Result<Json<i64>, AppError> {
    Ok(Json(
        service
            .get_total_copies_sold_by_author(&params.author)
            .await?,
    ))
}

async fn get_books_sorted_by_rating(State(service): SharedService) -> Json<Vec<BookDto>> {
    Json(service.get_books_sorted_by_rating().await)
}

async fn get_recent_books(
    State(service): SharedService,
    ApiQuery(params): ApiQuery<YearsParams>,
) -> Json<Vec<BookDto>> {
    Json(service.get_recent_books(params.years).await)
}
