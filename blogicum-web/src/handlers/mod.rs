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

pub mod auth;
pub mod blog;
pub mod comments;
pub mod posts;
pub mod profile;

pub use auth::{login, login_form, logout, register, registration_form};
pub use blog::{category_posts, index, profile as profile_page};
pub use comments::{
    add_comment, add_comment_form, delete_comment, delete_comment_form, edit_comment,
    edit_comment_form,
};
pub use posts::{
    create_post, create_post_form, delete_post, delete_post_form, edit_post, edit_post_form,
    post_detail,
};
pub use profile::{edit_profile, edit_profile_form};

use axum::response::Html;
use blogicum_core::models::user::User;
use tera::Context;

use crate::{error::AppError, AppState};

pub const SITE_TITLE: &str = "Blogicum";

/// Context every page starts from: the site title and, when logged in, a
/// hash-free view of the current user
pub(crate) fn base_context(user: Option<&User>) -> Context {
    let mut context = Context::new();
    context.insert("site_title", SITE_TITLE);

    if let Some(profile) = user.and_then(|u| u.profile()) {
        context.insert("user", &profile);
    }

    context
}

pub(crate) fn render(
    state: &AppState,
    template_name: &str,
    context: &Context,
) -> Result<Html<String>, AppError> {
    let html = state.templates.render(template_name, context).map_err(|e| {
        AppError::internal_server_error(format!("Failed to render {}", template_name))
            .with_details(format!("{:?}", e))
    })?;

    Ok(Html(html))
}

pub(crate) fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}
