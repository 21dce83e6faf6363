// Blogicum - A blog platform built with Rust
// Copyright (C) 2026 Blogicum Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use blogicum_core::models::{session::Session, user::User};
use blogicum_db::repositories::{SessionRepository, UserRepository};
use chrono::Duration;

use crate::{
    auth::{OptionalUser, LOGIN_URL, SESSION_COOKIE},
    error::AppError,
    forms::{LoginForm, RegistrationForm},
    handlers::{base_context, render},
    AppState,
};

fn render_login(
    state: &AppState,
    error: Option<&str>,
    username: &str,
) -> Result<Html<String>, AppError> {
    let mut context = base_context(None);
    if let Some(error) = error {
        context.insert("error", error);
    }
    context.insert("username", username);

    render(state, "login.html", &context)
}

/// Display the login form
pub async fn login_form(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Html<String>, AppError> {
    let mut context = base_context(viewer.user());
    context.insert("username", "");

    render(&state, "login.html", &context)
}

/// Handle a login attempt. The error message never reveals whether the
/// username exists.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user_repo = UserRepository::new(state.db.clone());

    let user = if form.username.contains('@') {
        user_repo.find_by_email(&form.username).await?
    } else {
        user_repo.find_by_username(&form.username).await?
    };

    let user = match user {
        Some(user) if user.is_active => user,
        _ => {
            return Ok(render_login(
                &state,
                Some("Invalid username or password"),
                &form.username,
            )?
            .into_response());
        }
    };

    match user.verify_password(&form.password) {
        Ok(true) => {}
        Ok(false) => {
            return Ok(render_login(
                &state,
                Some("Invalid username or password"),
                &form.username,
            )?
            .into_response());
        }
        Err(e) => {
            tracing::error!("Password verification error: {:?}", e);
            return Err(AppError::internal_server_error("Login failed"));
        }
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;

    let session = Session::new_with_expiry(user_id, Duration::hours(state.config.session_hours));
    let session_id = session.id.clone();

    SessionRepository::new(state.db.clone())
        .create(&session)
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// Destroy the session and clear the cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let session_id = session_cookie.value();

        // A stale cookie pointing at a vanished session is not an error
        let _ = SessionRepository::new(state.db.clone())
            .delete(session_id)
            .await;
    }

    let jar = jar.remove(SESSION_COOKIE);

    Ok((jar, Redirect::to(LOGIN_URL)).into_response())
}

/// Display the registration form
pub async fn registration_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut context = base_context(None);
    context.insert("form", &RegistrationForm::default());

    render(&state, "registration.html", &context)
}

/// Create an account and send the new user to the login form
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let user_repo = UserRepository::new(state.db.clone());

    let mut errors = form.validate();

    if !errors.contains_key("username")
        && user_repo.find_by_username(&form.username).await?.is_some()
    {
        errors.insert(
            "username".to_string(),
            "This username is already taken".to_string(),
        );
    }
    if !errors.contains_key("email") && user_repo.find_by_email(&form.email).await?.is_some() {
        errors.insert(
            "email".to_string(),
            "An account with this email already exists".to_string(),
        );
    }

    if !errors.is_empty() {
        let mut context = base_context(None);
        context.insert("form", &form);
        context.insert("errors", &errors);

        return Ok(render(&state, "registration.html", &context)?.into_response());
    }

    let user = User::new(form.email.clone(), form.username.clone(), &form.password)
        .map_err(|e| AppError::bad_request("Invalid registration").with_details(e.to_string()))?;
    user_repo.create(&user).await?;

    Ok(Redirect::to(LOGIN_URL).into_response())
}
