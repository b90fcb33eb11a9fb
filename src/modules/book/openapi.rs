//! OpenAPI fragment for the book module. Paths are relative to `/api/book`.

use serde_json::{json, Map, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn book_ref() -> Value {
    json!({ "$ref": "#/components/schemas/Book" })
}

fn stored_book_ref() -> Value {
    json!({ "$ref": "#/components/schemas/StoredBook" })
}

fn book_list() -> Value {
    json!({ "type": "array", "items": stored_book_ref() })
}

fn query_param(name: &str, schema: Value, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": true,
        "description": description,
        "schema": schema
    })
}

fn string_param(name: &str, description: &str) -> Value {
    query_param(name, json!({ "type": "string" }), description)
}

fn int_param(name: &str, description: &str) -> Value {
    query_param(name, json!({ "type": "integer", "format": "int32" }), description)
}

fn id_param() -> Value {
    query_param(
        "id",
        json!({ "type": "string", "format": "uuid" }),
        "Identifier of the book",
    )
}

fn book_body(description: &str) -> Value {
    json!({
        "required": true,
        "description": description,
        "content": { "application/json": { "schema": book_ref() } }
    })
}

fn list_operation(summary: &str, parameters: Vec<Value>) -> Value {
    json!({
        "get": {
            "summary": summary,
            "tags": ["Books"],
            "parameters": parameters,
            "responses": {
                "200": json_response("List of books", book_list())
            }
        }
    })
}

fn single_operation(summary: &str, parameters: Vec<Value>, missing: &str) -> Value {
    json!({
        "get": {
            "summary": summary,
            "tags": ["Books"],
            "parameters": parameters,
            "responses": {
                "200": json_response("Book", stored_book_ref()),
                "404": error_response(missing)
            }
        }
    })
}

fn book_schema(id_required: bool) -> Value {
    let mut required = vec![
        "title",
        "author",
        "pages",
        "rating",
        "numberOfCopiesSold",
        "publishedDate",
    ];
    if id_required {
        required.insert(0, "id");
    }

    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "format": "uuid",
                "description": "Unique identifier for the book"
            },
            "title": { "type": "string", "description": "Title of the book" },
            "author": { "type": "string", "description": "Author of the book" },
            "pages": { "type": "integer", "format": "int32", "description": "Page count" },
            "rating": { "type": "number", "format": "double", "description": "Reader rating" },
            "numberOfCopiesSold": {
                "type": "integer",
                "format": "int64",
                "description": "Copies sold to date"
            },
            "publishedDate": {
                "type": "integer",
                "format": "int32",
                "description": "Year of publication"
            }
        },
        "required": required
    })
}

/// Paths and schemas served by the book module.
pub fn spec() -> Value {
    let mut paths = Map::new();

    paths.insert(
        "/health".into(),
        json!({
            "get": {
                "summary": "Book module health check",
                "tags": ["Books"],
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": { "text/plain": { "schema": { "type": "string" } } }
                    }
                }
            }
        }),
    );
    paths.insert(
        "/addBook".into(),
        json!({
            "post": {
                "summary": "Add a book; an id is generated when omitted",
                "tags": ["Books"],
                "requestBody": book_body("Book to add"),
                "responses": {
                    "200": json_response(
                        "Identifier of the new book",
                        json!({ "type": "string", "format": "uuid" })
                    ),
                    "409": error_response("A book with this id already exists")
                }
            }
        }),
    );
    paths.insert(
        "/deleteBook".into(),
        json!({
            "delete": {
                "summary": "Delete a book",
                "tags": ["Books"],
                "parameters": [id_param()],
                "responses": {
                    "200": { "description": "Deleted" },
                    "404": error_response("Book not found")
                }
            }
        }),
    );
    paths.insert(
        "/updateBook".into(),
        json!({
            "put": {
                "summary": "Replace a stored book",
                "tags": ["Books"],
                "requestBody": book_body("Replacement book, id required"),
                "responses": {
                    "200": { "description": "Updated" },
                    "404": error_response("Book not found"),
                    "422": error_response("Missing id")
                }
            }
        }),
    );
    paths.insert(
        "/getBookById".into(),
        single_operation("Get a book by id", vec![id_param()], "Book not found"),
    );
    paths.insert(
        "/getAllBooks".into(),
        list_operation("List every book in storage order", vec![]),
    );
    paths.insert(
        "/getAllBooksByAuthor".into(),
        list_operation(
            "Books whose author contains the given text, ignoring case",
            vec![string_param("author", "Author substring")],
        ),
    );
    paths.insert(
        "/getTopRatedBook".into(),
        single_operation("Highest rated book", vec![], "Storage is empty"),
    );
    paths.insert(
        "/getBooksPublishedAfterYear".into(),
        list_operation(
            "Books published after the given year",
            vec![int_param("year", "Exclusive lower bound")],
        ),
    );
    paths.insert(
        "/getMostPopularBook".into(),
        single_operation("Book with the most copies sold", vec![], "Storage is empty"),
    );
    paths.insert(
        "/searchBooksByTitle".into(),
        list_operation(
            "Books whose title contains the keyword, ignoring case",
            vec![string_param("keyword", "Title substring")],
        ),
    );
    paths.insert(
        "/getBooksWithinPageRange".into(),
        list_operation(
            "Books whose page count lies in the inclusive range",
            vec![
                int_param("minPages", "Inclusive minimum"),
                int_param("maxPages", "Inclusive maximum"),
            ],
        ),
    );
    paths.insert(
        "/getTotalCopiesSoldByAuthor".into(),
        json!({
            "get": {
                "summary": "Largest copies-sold figure among the author's books",
                "description": "Maximum over books whose author matches exactly, not a sum.",
                "tags": ["Books"],
                "parameters": [string_param("author", "Exact author name")],
                "responses": {
                    "200": json_response(
                        "Copies sold",
                        json!({ "type": "integer", "format": "int64" })
                    ),
                    "404": error_response("Author has no books")
                }
            }
        }),
    );
    paths.insert(
        "/getBooksSortedByRating".into(),
        list_operation("Books by rating descending, then author", vec![]),
    );
    paths.insert(
        "/getRecentBooks".into(),
        list_operation(
            "Books published within the last N years",
            vec![int_param("years", "Number of years back from the current year")],
        ),
    );

    json!({
        "paths": paths,
        "components": {
            "schemas": {
                "Book": book_schema(false),
                "StoredBook": book_schema(true)
            }
        }
    })
}
