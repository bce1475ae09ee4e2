//! Authentication Handlers
//!
//! Handles login, current-user info and admin user management

use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::ValidateEmail;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::validation;
use crate::utils::AppError;

// Re-use shared DTOs for API consistency
use shared::client::{ChangePasswordRequest, LoginRequest, LoginResponse, RoleUpdate, UserCreate, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Roles a user can hold
const VALID_ROLES: [&str; 3] = ["admin", "staff", "viewer"];

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        email: user.email.clone(),
        role: user.role.clone(),
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = UserRepository::new(state.get_db());
    let email = req.email.to_lowercase();

    let user = repo.find_by_email(&email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent email enumeration
    let user = match user {
        Some(u) => {
            // User found - check active status
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            // Verify password
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Generate JWT token
    let jwt_service = state.get_jwt_service();
    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = jwt_service
        .generate_token(&user_id, &user.email, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: user_info(&user),
    }))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    // Query fresh user data for is_active and created_at
    let repo = UserRepository::new(state.get_db());
    let stored = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(user_info(&stored)))
}

/// Self-service password change
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<bool>, AppError> {
    validation::validate_password(&req.new_password)?;

    let repo = UserRepository::new(state.get_db());
    let stored = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let current_valid = stored
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !current_valid {
        return Err(AppError::invalid_credentials());
    }

    let hash = User::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    repo.update_password(&user.id, &hash).await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(true))
}

/// List users (admin)
pub async fn list_users(
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserInfo>>, AppError> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users.iter().map(user_info).collect()))
}

/// Create a user (admin)
pub async fn create_user(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserInfo>), AppError> {
    if !req.email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }
    validation::validate_password(&req.password)?;

    let role = req.role.as_deref().unwrap_or("staff");
    if !VALID_ROLES.contains(&role) {
        return Err(AppError::validation(format!("Unknown role: {}", role)));
    }

    let hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(&req.email, &hash, role).await?;

    tracing::info!(email = %user.email, role = %user.role, "User created");

    Ok((StatusCode::CREATED, Json(user_info(&user))))
}

/// Change a user's role (admin)
pub async fn change_role(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<RoleUpdate>,
) -> Result<Json<UserInfo>, AppError> {
    if !VALID_ROLES.contains(&req.role.as_str()) {
        return Err(AppError::validation(format!("Unknown role: {}", req.role)));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.update_role(&id, &req.role).await?;

    tracing::info!(user_id = %id, role = %req.role, "Role changed");

    Ok(Json(user_info(&user)))
}
