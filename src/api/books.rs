//! Catalog endpoints: browse, add, edit, delete

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{Book, BookFields, BookFilter, BookForm, BookQuery, YearParsing},
};

use super::AuthenticatedUser;

/// Filtered listing
#[derive(Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<Book>,
    pub total: usize,
}

/// List books matching the filters.
///
/// A `year` that is not an integer is ignored.
#[utoipa::path(
    get,
    path = "/",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BookList)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookList>> {
    let filter = BookFilter::from_query(&query, YearParsing::Lenient)?;
    let books = state.services.catalog.search_books(&filter).await?;

    Ok(Json(BookList {
        total: books.len(),
        books,
    }))
}

/// Blank add form
#[utoipa::path(
    get,
    path = "/add",
    tag = "books",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty form", body = BookForm),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn new_book_form(_user: AuthenticatedUser) -> Json<BookForm> {
    Json(BookForm::default())
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/add",
    tag = "books",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing title or invalid year", body = ErrorResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Form(form): Form<BookForm>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let fields = BookFields::try_from(form)?;
    let created = state.services.catalog.create_book(fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit form prefilled with the current record
#[utoipa::path(
    get,
    path = "/edit/{id}",
    tag = "books",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Current values", body = BookForm),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book_form(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<BookForm>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(BookForm::from(&book)))
}

/// Replace every field of an existing book
#[utoipa::path(
    post,
    path = "/edit/{id}",
    tag = "books",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Missing title or invalid year", body = ErrorResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> AppResult<Json<Book>> {
    let fields = BookFields::try_from(form)?;
    let updated = state.services.catalog.update_book(id, fields).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    get,
    path = "/delete/{id}",
    tag = "books",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
