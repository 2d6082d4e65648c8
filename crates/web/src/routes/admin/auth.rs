//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{
    RequireAdmin, clear_current_admin, push_flash, set_current_admin, take_flashes,
};
use crate::models::{CurrentAdmin, FlashMessage};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<FlashMessage>,
}

/// Display the login form.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        flashes: take_flashes(&session).await,
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let admin = CurrentAdmin::from(&user);
            set_current_admin(&session, &admin).await?;
            set_sentry_user(&admin.id, admin.username.as_str());

            tracing::info!(admin_id = %admin.id, "Admin logged in");
            push_flash(&session, FlashMessage::success("Logged in successfully")).await;
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "Admin login failed");
            push_flash(&session, FlashMessage::danger("Invalid username or password")).await;
            Ok(Redirect::to("/admin/login").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Clear the admin flag and return to the login page.
pub async fn logout(RequireAdmin(admin): RequireAdmin, session: Session) -> Result<Redirect, AppError> {
    clear_current_admin(&session).await?;
    clear_sentry_user();

    tracing::info!(admin_id = %admin.id, "Admin logged out");
    push_flash(&session, FlashMessage::success("Logged out")).await;
    Ok(Redirect::to("/admin/login"))
}
