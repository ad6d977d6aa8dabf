//! CSV upload and download endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{book::BookFilter, BookQuery, ImportSummary},
};

use super::AuthenticatedUser;

/// Import books from an uploaded CSV file (multipart field `file`)
#[utoipa::path(
    post,
    path = "/upload",
    tag = "exchange",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "CSV file in field `file`"
    ),
    responses(
        (status = 200, description = "Books imported", body = ImportSummary),
        (status = 400, description = "Invalid row or missing file", body = ErrorResponse),
        (status = 401, description = "Not logged in"),
        (status = 415, description = "Not a CSV file", body = ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let summary = state
            .services
            .exchange
            .import_file(&file_name, &contents)
            .await?;
        return Ok(Json(summary));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Download the filtered catalog as `books.csv`
#[utoipa::path(
    get,
    path = "/download",
    tag = "exchange",
    params(BookQuery),
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid year filter (strict mode)", body = ErrorResponse)
    )
)]
pub async fn download(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = BookFilter::from_query(&query, state.config.catalog.export_year_parsing())?;
    let body = state.services.exchange.export_csv(&filter).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"books.csv\""),
        ],
        body,
    ))
}
