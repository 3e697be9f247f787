/// Authentication routes
///
/// One code path per operation: registration, login, token refresh and
/// profile access. Handlers validate input, talk to the user store and
/// hand token work to the token engine; they never build or inspect
/// tokens themselves.
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{
    hash_password, issue_token_pair, rotate_tokens, verify_password, Claims, TokenPair,
};
use crate::configuration::{JwtSettings, PasswordSettings};
use crate::error::{AppError, AuthError, ErrorContext, ValidationError};
use crate::store::{InsertOutcome, UserRecord, UserStore};
use crate::validators::{is_valid_email, is_valid_name};

/// User registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Optional display name; defaults to empty.
    pub name: Option<String>,
}

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// User information returned alongside tokens
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Authentication response: user snapshot plus a fresh token pair
#[derive(Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token refresh response: a fresh token pair only
#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Profile response, read from the validated claims snapshot
#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
}

impl AuthResponse {
    fn new(user: &UserRecord, tokens: TokenPair, jwt_config: &JwtSettings) -> Self {
        Self {
            user: UserResponse {
                id: user.id.to_string(),
                email: user.email.clone(),
                name: user.name.clone(),
            },
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
        }
    }
}

/// POST /auth/register
///
/// Register a new user with email, password, and optional name.
/// Returns the user snapshot plus an initial token pair.
///
/// # Errors
/// - 400: Validation errors (invalid email/password/name)
/// - 409: Email already registered
/// - 500: Internal server error
pub async fn register(
    form: web::Json<RegisterRequest>,
    store: web::Data<dyn UserStore>,
    jwt_config: web::Data<JwtSettings>,
    password_config: web::Data<PasswordSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    // Absent and present-but-empty names both take the empty default
    let name = match form.name.as_deref() {
        Some(name) if !name.trim().is_empty() => is_valid_name(name)?,
        _ => String::new(),
    };
    if form.password.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }
    let password_hash = hash_password(&form.password, password_config.hash_cost)?;

    let user = UserRecord::new(email, name, password_hash);

    // The store arbitrates concurrent registrations for the same email;
    // a lost race surfaces here as EmailTaken, same as a plain
    // duplicate.
    match store.insert(&user).await? {
        InsertOutcome::Created => {}
        InsertOutcome::EmailTaken => {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
    }

    let tokens = issue_token_pair(&user.id, &user.email, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(AuthResponse::new(&user, tokens, jwt_config.get_ref())))
}

/// POST /auth/login
///
/// Authenticate with email and password; returns a fresh token pair.
///
/// # Errors
/// - 400: Validation error (missing or malformed fields)
/// - 401: Invalid credentials
/// - 500: Internal server error
///
/// # Security Notes
/// Unknown email and wrong password produce the identical 401 to
/// prevent user enumeration.
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn UserStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let email = is_valid_email(&form.email)?;
    if form.password.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }

    let user = store
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    if !verify_password(&form.password, &user.password_hash) {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let tokens = issue_token_pair(&user.id, &user.email, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(AuthResponse::new(&user, tokens, jwt_config.get_ref())))
}

/// POST /auth/refresh
///
/// Exchange a valid refresh token for a brand-new token pair
/// (rotation). The old refresh token is not revoked; without a
/// revocation store it stays valid until its own expiry.
///
/// # Errors
/// - 400: Missing or empty refresh token
/// - 401: Invalid, expired, or wrong-class token
/// - 500: Internal server error
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    if form.refresh_token.trim().is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "refresh_token".to_string(),
        )));
    }

    let tokens = rotate_tokens(&form.refresh_token, jwt_config.get_ref())?;

    tracing::info!(request_id = %context.request_id, "Token pair rotated");

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.access_token_expiry,
    }))
}

/// GET /auth/profile
///
/// Return the authenticated user's identity. The response comes
/// straight from the validated claims snapshot; the user store is not
/// consulted.
///
/// # Authentication
/// Requires `Authorization: Bearer <access_token>`; claims are
/// injected by the JWT middleware.
pub async fn get_profile(claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ProfileResponse {
        id: claims.sub.clone(),
        email: claims.email.clone(),
    }))
}
