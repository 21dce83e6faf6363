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

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::Response;
use blogicum_core::models::{category::Category, post::Post, session::Session, user::User};
use blogicum_db::repositories::{
    CategoryRepository, PostRepository, SessionRepository, UserRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::template_engine::TemplateEngine;
use crate::templates::default_tera;
use crate::{AppState, Config};

pub async fn create_test_app_state() -> Result<AppState> {
    let pool = SqlitePool::connect(":memory:").await?;
    blogicum_db::create_schema(&pool).await?;

    let templates = TemplateEngine::Static(Arc::new(default_tera()?));

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        host: "localhost".to_string(),
        port: 3000,
        templates_dir: "templates".to_string(),
        uploads_dir: std::env::temp_dir()
            .join("blogicum-test-uploads")
            .to_string_lossy()
            .to_string(),
        development_mode: false,
        page_size: 10,
        session_hours: 24,
        max_upload_size: 1_048_576, // 1MB for tests
    };

    Ok(AppState::new(pool, templates, config))
}

pub async fn create_test_user(pool: &SqlitePool, username: &str, is_staff: bool) -> Result<User> {
    let mut user = User::new(
        format!("{}@example.com", username),
        username.to_string(),
        "password123",
    )?;
    user.is_staff = is_staff;

    let user_id = UserRepository::new(pool.clone()).create(&user).await?;
    user.id = Some(user_id);

    Ok(user)
}

pub async fn create_test_category(
    pool: &SqlitePool,
    title: &str,
    is_published: bool,
) -> Result<Category> {
    let mut category = Category::new(title.to_string(), None);
    category.is_published = is_published;

    let category_id = CategoryRepository::new(pool.clone()).create(&category).await?;
    category.id = Some(category_id);

    Ok(category)
}

pub async fn create_test_post(
    pool: &SqlitePool,
    author_id: i64,
    category_id: Option<i64>,
    title: &str,
) -> Result<Post> {
    let mut post = Post::new(title.to_string(), "Some body text".to_string(), author_id);
    post.category_id = category_id;

    let post_id = PostRepository::new(pool.clone()).create(&post).await?;
    post.id = Some(post_id);

    Ok(post)
}

/// Open a session for `user` and return the extractor value handlers take
pub async fn login_as(pool: &SqlitePool, user: &User) -> Result<CurrentUser> {
    let user_id = user.id.ok_or_else(|| anyhow::anyhow!("User has no id"))?;

    let session = Session::new(user_id);
    SessionRepository::new(pool.clone()).create(&session).await?;

    Ok(CurrentUser {
        user: user.clone(),
        session,
    })
}

pub fn assert_redirect(response: &Response, target: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without location header")
        .to_str()
        .expect("non-utf8 location header");
    assert_eq!(location, target);
}
