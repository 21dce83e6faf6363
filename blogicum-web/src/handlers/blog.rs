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

//! The three listings: index, category, and profile. All of them order by
//! descending publication date, annotate comment counts, and paginate.

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use blogicum_core::Paginator;
use blogicum_db::repositories::{CategoryRepository, PostRepository, UserRepository};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    auth::OptionalUser,
    error::AppError,
    handlers::{base_context, render},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// Front page: publicly visible posts only
pub async fn index(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let now = Utc::now();
    let post_repo = PostRepository::new(state.db.clone());

    let total = post_repo.count_published(now).await?;
    let paginator = Paginator::new(query.page.unwrap_or(1), state.config.page_size, total);
    let posts = post_repo
        .list_published(now, paginator.limit(), paginator.offset())
        .await?;

    let mut context = base_context(viewer.user());
    context.insert("posts", &posts);
    context.insert("paginator", &paginator.context());

    render(&state, "index.html", &context)
}

/// One category's published, due posts. Unknown or unpublished categories
/// are indistinguishable from missing ones.
pub async fn category_posts(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let category_repo = CategoryRepository::new(state.db.clone());
    let category = category_repo
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    let category_id = category
        .id
        .ok_or_else(|| AppError::internal_server_error("Category has no id"))?;

    let now = Utc::now();
    let post_repo = PostRepository::new(state.db.clone());

    let total = post_repo.count_in_category(category_id, now).await?;
    let paginator = Paginator::new(query.page.unwrap_or(1), state.config.page_size, total);
    let posts = post_repo
        .list_in_category(category_id, now, paginator.limit(), paginator.offset())
        .await?;

    let mut context = base_context(viewer.user());
    context.insert("category", &category);
    context.insert("posts", &posts);
    context.insert("paginator", &paginator.context());

    render(&state, "category.html", &context)
}

/// A user's page with every post they wrote, drafts and scheduled included
pub async fn profile(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let user_repo = UserRepository::new(state.db.clone());
    let profile_user = user_repo
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let author_id = profile_user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;

    let post_repo = PostRepository::new(state.db.clone());
    let total = post_repo.count_by_author(author_id).await?;
    let paginator = Paginator::new(query.page.unwrap_or(1), state.config.page_size, total);
    let posts = post_repo
        .list_by_author(author_id, paginator.limit(), paginator.offset())
        .await?;

    let mut context = base_context(viewer.user());
    context.insert("profile", &profile_user.profile());
    context.insert("posts", &posts);
    context.insert("paginator", &paginator.context());

    render(&state, "profile.html", &context)
}
