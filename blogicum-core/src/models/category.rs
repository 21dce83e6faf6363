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
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

static SLUG_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Failed to compile slug regex"));

/// A publication category. Unpublished categories hide every post in them
/// from public listings and detail views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Option<i64>,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new published category; the slug is derived from the title
    /// when not given explicitly.
    pub fn new(title: String, slug: Option<String>) -> Self {
        let slug = slug.unwrap_or_else(|| slugify(&title));

        Self {
            id: None,
            slug,
            title,
            description: String::new(),
            is_published: true,
            created_at: Utc::now(),
        }
    }

    pub fn validate_slug(slug: &str) -> Result<(), String> {
        if slug.is_empty() {
            return Err("Slug cannot be empty".to_string());
        }

        if slug.len() > 100 {
            return Err("Slug cannot exceed 100 characters".to_string());
        }

        if !SLUG_FORMAT.is_match(slug) {
            return Err(
                "Slug must contain only lowercase letters, numbers, and single hyphens".to_string(),
            );
        }

        Ok(())
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

    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_slug(&self.slug)?;
        Self::validate_title(&self.title)?;
        Ok(())
    }
}
