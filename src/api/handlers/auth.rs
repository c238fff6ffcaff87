//! Handlers for registration, login and password management.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse,
    LoginRequest, ProfileResponse, RegisterRequest, ResetPasswordRequest,
};
use crate::api::dto::message::MessageResponse;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and returns a session token.
///
/// # Endpoint
///
/// `POST /v1/auth/register`
///
/// # Errors
///
/// - 422 when name, email or password fail validation
/// - 409 when the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .register(payload.name.trim().to_string(), &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Usuario registrado correctamente".to_string(),
            user: session.user.into(),
            token: session.token,
        }),
    ))
}

/// `POST /v1/auth/login`
///
/// Unknown emails and wrong passwords get the same 401.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "Inicio de sesión exitoso".to_string(),
        user: session.user.into(),
        token: session.token,
    }))
}

/// `POST /v1/auth/forgot-password`
///
/// Always answers with the same message so callers cannot probe for accounts.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    payload.validate()?;

    let reset_token = state.auth_service.forgot_password(&payload.email).await?;

    Ok(Json(ForgotPasswordResponse {
        message: "Si el email está registrado, recibirás instrucciones para restablecer tu contraseña"
            .to_string(),
        reset_token,
    }))
}

/// `POST /v1/auth/reset-password/{token}`
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .auth_service
        .reset_password(&token, &payload.password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Contraseña restablecida correctamente",
    )))
}

/// `GET /v1/auth/profile`
pub async fn profile_handler(Extension(user): Extension<User>) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: user.into() })
}

/// `POST /v1/auth/change-password`
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .auth_service
        .change_password(&user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Contraseña actualizada correctamente")))
}
