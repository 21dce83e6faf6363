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

//! Form structs bound from submitted data. Each form validates into a
//! field → message map; handlers re-render the bound form with that map
//! so the user's input is never lost.

use axum::extract::Multipart;
use blogicum_core::models::comment::Comment;
use blogicum_core::models::post::Post;
use blogicum_core::models::user::User;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;

pub type FormErrors = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(skip_serializing, default)]
    pub password_confirm: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(e) = User::validate_username(&self.username) {
            errors.insert("username".to_string(), e);
        }
        if let Err(e) = User::validate_email(&self.email) {
            errors.insert("email".to_string(), e);
        }
        if self.password.len() < 8 {
            errors.insert(
                "password".to_string(),
                "Password must be at least 8 characters".to_string(),
            );
        }
        if self.password != self.password_confirm {
            errors.insert(
                "password_confirm".to_string(),
                "Passwords do not match".to_string(),
            );
        }

        errors
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(e) = User::validate_username(&self.username) {
            errors.insert("username".to_string(), e);
        }
        if let Err(e) = User::validate_email(&self.email) {
            errors.insert("email".to_string(), e);
        }

        errors
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(e) = Comment::validate_text(&self.text) {
            errors.insert("text".to_string(), e);
        }

        errors
    }
}

/// The post form excludes `author` and `is_published`: the author comes
/// from the session, publication is an editorial flag. `pub_date` keeps
/// the raw submitted string so an invalid value re-renders as typed.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub category_id: Option<i64>,
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: format_datetime_local(post.pub_date),
            category_id: post.category_id,
        }
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(e) = Post::validate_title(&self.title) {
            errors.insert("title".to_string(), e);
        }
        if let Err(e) = Post::validate_text(&self.text) {
            errors.insert("text".to_string(), e);
        }
        if !self.pub_date.trim().is_empty() && self.parsed_pub_date().is_none() {
            errors.insert(
                "pub_date".to_string(),
                "Enter a valid publication date".to_string(),
            );
        }

        errors
    }

    /// The submitted publication date, if one was given and parses
    pub fn parsed_pub_date(&self) -> Option<DateTime<Utc>> {
        parse_datetime_local(self.pub_date.trim())
    }
}

/// A file submitted through the post form, not yet written to disk
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Bind the multipart post form. Unknown fields are ignored; an image part
/// without a filename or content counts as "no upload".
pub async fn read_post_form(
    multipart: &mut Multipart,
) -> Result<(PostForm, Option<UploadedImage>), AppError> {
    let mut form = PostForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("Invalid form data").with_details(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = read_text(field).await?,
            "text" => form.text = read_text(field).await?,
            "pub_date" => form.pub_date = read_text(field).await?,
            "category" => {
                let raw = read_text(field).await?;
                form.category_id = raw.trim().parse().ok();
            }
            "image" => {
                let filename = field.file_name().map(str::to_string).unwrap_or_default();
                let data = field.bytes().await.map_err(|e| {
                    AppError::bad_request("Invalid file upload").with_details(e.to_string())
                })?;

                if !filename.is_empty() && !data.is_empty() {
                    image = Some(UploadedImage {
                        filename,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((form, image))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::bad_request("Invalid form data").with_details(e.to_string()))
}

/// Parse the value of an `<input type="datetime-local">`, with RFC3339 as
/// a fallback. The browser submits naive local time; it is recorded as UTC.
pub fn parse_datetime_local(raw: &str) -> Option<DateTime<Utc>> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn format_datetime_local(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}
