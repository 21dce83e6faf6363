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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Option<i64>,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment annotated with its author's username for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: Comment,
    pub author_username: String,
}

impl Comment {
    pub fn new(post_id: i64, author_id: i64, text: String) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            post_id,
            author_id,
            text,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate_text(text: &str) -> Result<(), String> {
        if text.trim().is_empty() {
            return Err("Comment cannot be empty".to_string());
        }

        Ok(())
    }

    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_text(&self.text)
    }

    /// Only the comment's author may edit or delete it
    pub fn can_modify(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}
