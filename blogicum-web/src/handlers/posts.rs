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

//! Post detail and the create/edit/delete flows. Every mutating flow runs
//! fetch-or-404, then the ownership check, then form binding. Ownership
//! failures redirect to the detail page instead of erroring.

use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use blogicum_core::models::post::Post;
use blogicum_db::repositories::{CategoryRepository, CommentRepository, PostRepository};
use chrono::Utc;

use crate::{
    auth::{CurrentUser, OptionalUser},
    error::AppError,
    forms::{read_post_form, CommentForm, FormErrors, PostForm},
    handlers::{base_context, post_detail_url, profile_url, render},
    uploads::save_image,
    AppState,
};

/// Post page with comments and, for logged-in readers, a comment form.
/// Only the author sees their own unpublished, scheduled, or
/// hidden-category post; everyone else gets a 404.
pub async fn post_detail(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let post_repo = PostRepository::new(state.db.clone());
    let detail = post_repo
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let now = Utc::now();
    if !detail
        .post
        .can_view(viewer.user_id(), detail.category.as_ref(), now)
    {
        return Err(AppError::not_found("Post not found"));
    }

    let comments = CommentRepository::new(state.db.clone())
        .list_for_post(id)
        .await?;

    let can_edit = viewer
        .user_id()
        .map_or(false, |user_id| detail.post.can_edit(user_id));
    let can_delete = viewer
        .user()
        .map_or(false, |user| detail.post.can_delete(user));

    let mut context = base_context(viewer.user());
    context.insert("post", &detail);
    context.insert("comments", &comments);
    context.insert("can_edit", &can_edit);
    context.insert("can_delete", &can_delete);
    context.insert("form", &CommentForm::default());

    render(&state, "detail.html", &context)
}

async fn render_post_form(
    state: &AppState,
    current: &CurrentUser,
    form: &PostForm,
    errors: &FormErrors,
    editing_post_id: Option<i64>,
) -> Result<Html<String>, AppError> {
    let categories = CategoryRepository::new(state.db.clone()).list_all().await?;

    let mut context = base_context(Some(&current.user));
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("categories", &categories);
    context.insert("editing", &editing_post_id.is_some());
    if let Some(post_id) = editing_post_id {
        context.insert("post_id", &post_id);
    }

    render(state, "post_form.html", &context)
}

/// Reject a category id that does not reference an existing category; the
/// value only arrives out-of-range from hand-crafted requests
async fn check_category(
    state: &AppState,
    form: &PostForm,
    errors: &mut FormErrors,
) -> Result<(), AppError> {
    if let Some(category_id) = form.category_id {
        let known = CategoryRepository::new(state.db.clone())
            .find_by_id(category_id)
            .await?
            .is_some();

        if !known {
            errors.insert(
                "category".to_string(),
                "Select a valid category".to_string(),
            );
        }
    }

    Ok(())
}

pub async fn create_post_form(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    render_post_form(&state, &current, &PostForm::default(), &FormErrors::new(), None).await
}

pub async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (form, image) = read_post_form(&mut multipart).await?;

    let mut errors = form.validate();
    check_category(&state, &form, &mut errors).await?;
    if !errors.is_empty() {
        return Ok(render_post_form(&state, &current, &form, &errors, None)
            .await?
            .into_response());
    }

    let author_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;

    let mut post = Post::new(form.title.clone(), form.text.clone(), author_id);
    if let Some(pub_date) = form.parsed_pub_date() {
        post.pub_date = pub_date;
    }
    post.category_id = form.category_id;

    if let Some(image) = image {
        match save_image(&state.config.uploads_dir, &image).await {
            Ok(stored_name) => post.image = Some(stored_name),
            Err(e) => {
                tracing::warn!("Rejected upload: {:?}", e);
                errors.insert(
                    "image".to_string(),
                    "Upload a valid image file".to_string(),
                );
                return Ok(render_post_form(&state, &current, &form, &errors, None)
                    .await?
                    .into_response());
            }
        }
    }

    PostRepository::new(state.db.clone()).create(&post).await?;

    Ok(Redirect::to(&profile_url(&current.user.username)).into_response())
}

pub async fn edit_post_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let post_repo = PostRepository::new(state.db.clone());
    let post = post_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let user_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;
    if !post.can_edit(user_id) {
        return Ok(Redirect::to(&post_detail_url(id)).into_response());
    }

    let form = PostForm::from_post(&post);
    Ok(
        render_post_form(&state, &current, &form, &FormErrors::new(), Some(id))
            .await?
            .into_response(),
    )
}

pub async fn edit_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let post_repo = PostRepository::new(state.db.clone());
    let mut post = post_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let user_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;
    if !post.can_edit(user_id) {
        return Ok(Redirect::to(&post_detail_url(id)).into_response());
    }

    let (form, image) = read_post_form(&mut multipart).await?;

    let mut errors = form.validate();
    check_category(&state, &form, &mut errors).await?;
    if !errors.is_empty() {
        return Ok(render_post_form(&state, &current, &form, &errors, Some(id))
            .await?
            .into_response());
    }

    post.title = form.title.clone();
    post.text = form.text.clone();
    post.category_id = form.category_id;
    if let Some(pub_date) = form.parsed_pub_date() {
        post.pub_date = pub_date;
    }
    post.updated_at = Utc::now();

    if let Some(image) = image {
        match save_image(&state.config.uploads_dir, &image).await {
            Ok(stored_name) => post.image = Some(stored_name),
            Err(e) => {
                tracing::warn!("Rejected upload: {:?}", e);
                errors.insert(
                    "image".to_string(),
                    "Upload a valid image file".to_string(),
                );
                return Ok(render_post_form(&state, &current, &form, &errors, Some(id))
                    .await?
                    .into_response());
            }
        }
    }

    post_repo.update(&post).await?;

    Ok(Redirect::to(&profile_url(&current.user.username)).into_response())
}

/// Confirmation page before deleting a post
pub async fn delete_post_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let post_repo = PostRepository::new(state.db.clone());
    let detail = post_repo
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if !detail.post.can_delete(&current.user) {
        return Ok(Redirect::to(&post_detail_url(id)).into_response());
    }

    let mut context = base_context(Some(&current.user));
    context.insert("post", &detail);

    Ok(render(&state, "post_confirm_delete.html", &context)?.into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let post_repo = PostRepository::new(state.db.clone());
    let post = post_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if !post.can_delete(&current.user) {
        return Ok(Redirect::to(&post_detail_url(id)).into_response());
    }

    post_repo.delete(id).await?;

    Ok(Redirect::to("/").into_response())
}
