use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::{Deserialize, Serialize};

use crate::auth::extract::AuthUser;
use crate::auth::password;
use crate::error::AppError;
use crate::models::user::{NewUser, User, UserType};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/create-driver", post(create_driver))
        .route("/api/auth/login", post(login))
}

// Fields are optional so that absent ones surface as a 400 with the demo's
// error body instead of a deserialization rejection.
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Serialize)]
pub struct CreatedUserResponse {
    pub user: User,
}

fn require(field: &Option<String>) -> Result<&str, AppError> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required fields".to_string()))
}

/// Public registration endpoint, restricted to admin accounts.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = require(&payload.email)?;
    let password = require(&payload.password)?;
    let user_type = require(&payload.user_type)?;
    let first_name = require(&payload.first_name)?;
    let last_name = require(&payload.last_name)?;

    if user_type != "admin" {
        return Err(AppError::Forbidden(
            "Only admin registration is allowed here.".to_string(),
        ));
    }

    let user = state
        .users
        .insert(NewUser {
            email: email.to_string(),
            password_hash: password::hash(password)?,
            user_type: UserType::Admin,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: payload.phone.clone(),
        })
        .await?;

    let token = state.jwt.sign(user.id, user.user_type)?;
    tracing::info!(user_id = user.id, "admin registered");

    Ok(Json(AuthResponse { user, token }))
}

/// Admin-only driver creation; the caller's token decides, not the payload.
async fn create_driver(
    AuthUser(claims): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<CreatedUserResponse>, AppError> {
    if claims.user_type != UserType::Admin {
        return Err(AppError::Forbidden(
            "Only admins can create drivers.".to_string(),
        ));
    }

    let email = require(&payload.email)?;
    let password = require(&payload.password)?;
    let first_name = require(&payload.first_name)?;
    let last_name = require(&payload.last_name)?;

    let user = state
        .users
        .insert(NewUser {
            email: email.to_string(),
            password_hash: password::hash(password)?,
            user_type: UserType::Driver,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: payload.phone.clone(),
        })
        .await?;

    tracing::info!(user_id = user.id, created_by = claims.id, "driver created");

    Ok(Json(CreatedUserResponse { user }))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let email = payload.email.as_deref().ok_or_else(invalid)?;
    let password = payload.password.as_deref().ok_or_else(invalid)?;

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify(password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = state.jwt.sign(user.id, user.user_type)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(AuthResponse { user, token }))
}
