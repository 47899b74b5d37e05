use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/auth/profile", get(get_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::bad_request("Password too short"));
    }

    // Ensure email is not taken
    let existing = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_email failed");
            ApiError::Internal(e)
        })?;
    if existing.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let user = User::create(
        &state.db,
        payload.name.trim(),
        &payload.email,
        &hash,
        payload.profile_image_url.as_deref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "create user failed");
        ApiError::Internal(e)
    })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Internal(e));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Internal(e)
    })?;

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn public_user_hides_password_hash() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            password_hash: "argon2-hash".into(),
            profile_image_url: None,
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(!json.contains("argon2-hash"));
    }
}
