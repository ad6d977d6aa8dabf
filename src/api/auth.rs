//! Login / logout endpoints

use axum::{extract::State, http::StatusCode, Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::{AuthenticatedUser, SESSION_COOKIE};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token, also set as the `session` cookie
    pub token: String,
    pub token_type: String,
}

/// Log in with the configured librarian credentials
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let token = state
        .services
        .auth
        .login(&request.username, &request.password)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

/// Drop the session cookie
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    security(("session_cookie" = []), ("bearer_auth" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn logout(
    AuthenticatedUser(claims): AuthenticatedUser,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    tracing::info!("Librarian {:?} logged out", claims.sub);
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}
