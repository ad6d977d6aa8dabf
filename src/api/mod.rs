//! HTTP handlers for the Bookshelf endpoints

pub mod auth;
pub mod books;
pub mod exchange;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use tower_http::trace::TraceLayer;

use crate::{error::AppError, models::session::SessionClaims, AppState};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Extractor for a logged-in librarian.
///
/// The session token is taken from an `Authorization: Bearer` header, or
/// from the session cookie set at login.
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| AppError::Authentication("Login required".to_string()))?,
        };

        let claims = state.services.auth.verify(&token)?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.import.max_upload_bytes;

    let catalog = Router::new()
        // Catalog
        .route("/", get(books::list_books))
        .route("/add", get(books::new_book_form).post(books::create_book))
        .route("/edit/:id", get(books::edit_book_form).post(books::update_book))
        .route("/delete/:id", get(books::delete_book))
        // Tabular exchange
        .route("/upload", post(exchange::upload))
        .route("/download", get(exchange::download))
        // Session
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state);

    Router::new()
        .merge(catalog)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
}
