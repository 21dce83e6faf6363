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

use anyhow::{Context, Result};
use blogicum_core::models::category::Category;
use sqlx::SqlitePool;

use crate::datetime::parse_utc;

type CategoryRow = (i64, String, String, String, bool, String);

const CATEGORY_COLUMNS: &str = "id, slug, title, description, is_published, created_at";

fn map_row(row: CategoryRow) -> Result<Category> {
    let (id, slug, title, description, is_published, created_at) = row;

    Ok(Category {
        id: Some(id),
        slug,
        title,
        description,
        is_published,
        created_at: parse_utc(&created_at)?,
    })
}

pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, category: &Category) -> Result<i64> {
        if let Err(e) = category.is_valid() {
            return Err(anyhow::anyhow!("Invalid category: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO categories (slug, title, description, is_published, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.slug)
        .bind(&category.title)
        .bind(&category.description)
        .bind(category.is_published)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create category")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {} FROM categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find category by id")?;

        row.map(map_row).transpose()
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {} FROM categories WHERE slug = ?",
            CATEGORY_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find category by slug")?;

        row.map(map_row).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {} FROM categories ORDER BY title",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        rows.into_iter().map(map_row).collect()
    }

    pub async fn update(&self, category: &Category) -> Result<()> {
        let id = category
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update category without an id"))?;

        if let Err(e) = category.is_valid() {
            return Err(anyhow::anyhow!("Invalid category: {}", e));
        }

        let rows_affected = sqlx::query(
            "UPDATE categories SET slug = ?, title = ?, description = ?, is_published = ? WHERE id = ?",
        )
        .bind(&category.slug)
        .bind(&category.title)
        .bind(&category.description)
        .bind(category.is_published)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update category")?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Category not found"));
        }

        Ok(())
    }

    /// Flip the published flag by slug; returns false if no such category
    pub async fn set_published(&self, slug: &str, is_published: bool) -> Result<bool> {
        let rows_affected = sqlx::query("UPDATE categories SET is_published = ? WHERE slug = ?")
            .bind(is_published)
            .bind(slug)
            .execute(&self.pool)
            .await
            .context("Failed to update category published flag")?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
