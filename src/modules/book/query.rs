//! Read-only queries over a snapshot of the collection.
//!
//! Every function scans the slice it is given; nothing is indexed or cached.
//! Text matching for `by_author` and `search_by_title` ignores case, while
//! `total_copies_sold_by_author` compares authors exactly.

use std::cmp::Ordering;

use super::error::{BookError, BookResult};
use super::models::Book;

/// Lowercases one char at a time. `str::to_lowercase` maps a word-final `Σ`
/// to `ς`, which would stop a lone `Σ` from matching inside a word.
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

fn filtered(books: &[Book], keep: impl Fn(&Book) -> bool) -> Vec<Book> {
    books.iter().filter(|book| keep(*book)).cloned().collect()
}

/// The snapshot unchanged.
pub fn all(books: &[Book]) -> Vec<Book> {
    books.to_vec()
}

pub fn by_author(books: &[Book], author: &str) -> Vec<Book> {
    filtered(books, |book| contains_ignore_case(&book.author, author))
}

pub fn search_by_title(books: &[Book], keyword: &str) -> Vec<Book> {
    filtered(books, |book| contains_ignore_case(&book.title, keyword))
}

/// Books published strictly after `year`.
pub fn published_after_year(books: &[Book], year: i32) -> Vec<Book> {
    filtered(books, |book| book.published_date > year)
}

/// Books published in `current_year - years` or later.
pub fn recent_books(books: &[Book], years: i32, current_year: i32) -> Vec<Book> {
    let cutoff = i64::from(current_year) - i64::from(years);
    filtered(books, |book| i64::from(book.published_date) >= cutoff)
}

/// Books with `min_pages <= pages <= max_pages`.
pub fn within_page_range(books: &[Book], min_pages: i32, max_pages: i32) -> Vec<Book> {
    filtered(books, |book| book.pages >= min_pages && book.pages <= max_pages)
}

// Adding 0.0 turns -0.0 into 0.0 so the two compare equal.
fn rating_order(a: &Book, b: &Book) -> Ordering {
    (b.rating + 0.0)
        .total_cmp(&(a.rating + 0.0))
        .then_with(|| a.author.cmp(&b.author))
}

/// Highest rating first; equal ratings ordered by author. The sort is stable,
/// so books sharing both rating and author keep their stored order.
pub fn sorted_by_rating(books: &[Book]) -> Vec<Book> {
    let mut sorted = books.to_vec();
    sorted.sort_by(rating_order);
    sorted
}

/// First entry of [`sorted_by_rating`].
pub fn top_rated(books: &[Book]) -> BookResult<Book> {
    books
        .iter()
        .min_by(|a, b| rating_order(a, b))
        .cloned()
        .ok_or(BookError::EmptyCollection)
}

/// Book with the most copies sold; the earliest stored one wins a tie.
pub fn most_popular(books: &[Book]) -> BookResult<Book> {
    books
        .iter()
        .fold(None::<&Book>, |best, book| match best {
            Some(current) if current.number_of_copies_sold >= book.number_of_copies_sold => {
                Some(current)
            }
            _ => Some(book),
        })
        .cloned()
        .ok_or(BookError::EmptyCollection)
}

/// Largest single-book `number_of_copies_sold` among books whose author is
/// exactly `author`.
///
/// Despite the name this returns the maximum, not a sum.
pub fn total_copies_sold_by_author(books: &[Book], author: &str) -> BookResult<i64> {
    books
        .iter()
        .filter(|book| book.author == author)
        .map(|book| book.number_of_copies_sold)
        .max()
        .ok_or_else(|| BookError::NoMatch(author.to_string()))
}
