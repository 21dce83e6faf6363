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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::category::Category;
use crate::models::user::User;

/// A blog post. `pub_date` may lie in the future for scheduled publication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: Option<i64>,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: a post annotated with its author, category, and comment count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_username: String,
    pub category_title: Option<String>,
    pub category_slug: Option<String>,
    pub comment_count: i64,
}

/// Detail row: a post joined with its author username and full category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author_username: String,
    pub category: Option<Category>,
}

impl Post {
    pub fn new(title: String, text: String, author_id: i64) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            title,
            text,
            image: None,
            pub_date: now,
            author_id,
            category_id: None,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate_title(title: &str) -> Result<(), String> {
        if title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if title.len() > 256 {
            return Err("Title cannot exceed 256 characters".to_string());
        }

        Ok(())
    }

    pub fn validate_text(text: &str) -> Result<(), String> {
        if text.trim().is_empty() {
            return Err("Text cannot be empty".to_string());
        }

        Ok(())
    }

    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_title(&self.title)?;
        Self::validate_text(&self.text)?;
        Ok(())
    }

    /// Whether the publication date is still in the future
    pub fn is_scheduled(&self, now: DateTime<Utc>) -> bool {
        self.pub_date > now
    }

    /// The public-visibility invariant: published, publication date reached,
    /// and the category published. A post without a category never passes.
    pub fn is_publicly_visible(&self, category: Option<&Category>, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.pub_date <= now
            && category.map_or(false, |c| c.is_published)
    }

    /// Whether `viewer` may open the detail page. Authors always see their
    /// own posts; everyone else needs the post to be publicly visible.
    pub fn can_view(
        &self,
        viewer_id: Option<i64>,
        category: Option<&Category>,
        now: DateTime<Utc>,
    ) -> bool {
        if viewer_id == Some(self.author_id) {
            return true;
        }
        self.is_publicly_visible(category, now)
    }

    /// Only the author may edit a post
    pub fn can_edit(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    /// The author or a staff user may delete a post
    pub fn can_delete(&self, user: &User) -> bool {
        user.is_staff || user.id == Some(self.author_id)
    }
}
