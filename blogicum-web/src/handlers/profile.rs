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

//! Profile editing: name, email, and username only. Password changes go
//! through the operator CLI; everything else about the account is fixed.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use blogicum_db::repositories::UserRepository;
use chrono::Utc;

use crate::{
    auth::CurrentUser,
    error::AppError,
    forms::{FormErrors, ProfileForm},
    handlers::{base_context, profile_url, render},
    AppState,
};

fn render_profile_form(
    state: &AppState,
    current: &CurrentUser,
    form: &ProfileForm,
    errors: &FormErrors,
) -> Result<Html<String>, AppError> {
    let mut context = base_context(Some(&current.user));
    context.insert("form", form);
    context.insert("errors", errors);

    render(state, "profile_edit.html", &context)
}

pub async fn edit_profile_form(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    let form = ProfileForm::from_user(&current.user);
    render_profile_form(&state, &current, &form, &FormErrors::new())
}

pub async fn edit_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let user_repo = UserRepository::new(state.db.clone());

    let mut errors = form.validate();

    // Username and email stay unique across accounts
    if !errors.contains_key("username") && form.username != current.user.username {
        if user_repo.find_by_username(&form.username).await?.is_some() {
            errors.insert(
                "username".to_string(),
                "This username is already taken".to_string(),
            );
        }
    }
    if !errors.contains_key("email") && form.email != current.user.email {
        if user_repo.find_by_email(&form.email).await?.is_some() {
            errors.insert(
                "email".to_string(),
                "An account with this email already exists".to_string(),
            );
        }
    }

    if !errors.is_empty() {
        return Ok(render_profile_form(&state, &current, &form, &errors)?.into_response());
    }

    let mut user = current.user.clone();
    user.first_name = form.first_name.trim().to_string();
    user.last_name = form.last_name.trim().to_string();
    user.email = form.email.clone();
    user.username = form.username.clone();
    user.updated_at = Utc::now();

    user_repo.update(&user).await?;

    Ok(Redirect::to(&profile_url(&user.username)).into_response())
}
