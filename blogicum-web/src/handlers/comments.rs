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

//! Comment flows. The author and parent post of a comment always come from
//! the session and the URL, never from the form. Ownership failures
//! redirect to the post detail page.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use blogicum_core::models::comment::Comment;
use blogicum_db::repositories::{CommentRepository, PostRepository};
use chrono::Utc;

use crate::{
    auth::CurrentUser,
    error::AppError,
    forms::{CommentForm, FormErrors},
    handlers::{base_context, post_detail_url, render},
    AppState,
};

fn render_comment_form(
    state: &AppState,
    current: &CurrentUser,
    form: &CommentForm,
    errors: &FormErrors,
    post_id: i64,
    comment_id: Option<i64>,
) -> Result<Html<String>, AppError> {
    let mut context = base_context(Some(&current.user));
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("post_id", &post_id);
    if let Some(comment_id) = comment_id {
        context.insert("comment_id", &comment_id);
    }

    render(state, "comment_form.html", &context)
}

/// Fetch a comment, 404 unless it exists under the post named in the URL
async fn fetch_comment(
    state: &AppState,
    post_id: i64,
    comment_id: i64,
) -> Result<Comment, AppError> {
    CommentRepository::new(state.db.clone())
        .find_by_id(comment_id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or_else(|| AppError::not_found("Comment not found"))
}

pub async fn add_comment_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    PostRepository::new(state.db.clone())
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    render_comment_form(
        &state,
        &current,
        &CommentForm::default(),
        &FormErrors::new(),
        post_id,
        None,
    )
}

pub async fn add_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(post_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    PostRepository::new(state.db.clone())
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(
            render_comment_form(&state, &current, &form, &errors, post_id, None)?
                .into_response(),
        );
    }

    let author_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;

    let comment = Comment::new(post_id, author_id, form.text.trim().to_string());
    CommentRepository::new(state.db.clone())
        .create(&comment)
        .await?;

    Ok(Redirect::to(&post_detail_url(post_id)).into_response())
}

pub async fn edit_comment_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    let comment = fetch_comment(&state, post_id, comment_id).await?;

    let user_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;
    if !comment.can_modify(user_id) {
        return Ok(Redirect::to(&post_detail_url(post_id)).into_response());
    }

    let form = CommentForm {
        text: comment.text.clone(),
    };

    Ok(
        render_comment_form(&state, &current, &form, &FormErrors::new(), post_id, Some(comment_id))?
            .into_response(),
    )
}

pub async fn edit_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let mut comment = fetch_comment(&state, post_id, comment_id).await?;

    let user_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;
    if !comment.can_modify(user_id) {
        return Ok(Redirect::to(&post_detail_url(post_id)).into_response());
    }

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(render_comment_form(
            &state,
            &current,
            &form,
            &errors,
            post_id,
            Some(comment_id),
        )?
        .into_response());
    }

    comment.text = form.text.trim().to_string();
    comment.updated_at = Utc::now();
    CommentRepository::new(state.db.clone())
        .update(&comment)
        .await?;

    Ok(Redirect::to(&post_detail_url(post_id)).into_response())
}

/// Confirmation page before deleting a comment
pub async fn delete_comment_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    let comment = fetch_comment(&state, post_id, comment_id).await?;

    let user_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;
    if !comment.can_modify(user_id) {
        return Ok(Redirect::to(&post_detail_url(post_id)).into_response());
    }

    let mut context = base_context(Some(&current.user));
    context.insert("comment", &comment);
    context.insert("post_id", &post_id);

    Ok(render(&state, "comment_confirm_delete.html", &context)?.into_response())
}

pub async fn delete_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    let comment = fetch_comment(&state, post_id, comment_id).await?;

    let user_id = current
        .user
        .id
        .ok_or_else(|| AppError::internal_server_error("User has no id"))?;
    if !comment.can_modify(user_id) {
        return Ok(Redirect::to(&post_detail_url(post_id)).into_response());
    }

    CommentRepository::new(state.db.clone())
        .delete(comment_id)
        .await?;

    Ok(Redirect::to(&post_detail_url(post_id)).into_response())
}
