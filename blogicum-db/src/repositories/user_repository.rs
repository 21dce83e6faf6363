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
use blogicum_core::models::user::User;
use sqlx::SqlitePool;

use crate::datetime::parse_utc;

type UserRow = (
    i64,    // id
    String, // email
    String, // username
    String, // first_name
    String, // last_name
    String, // password_hash
    bool,   // is_active
    bool,   // is_staff
    String, // created_at
    String, // updated_at
);

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, is_active, is_staff, created_at, updated_at";

fn map_row(row: UserRow) -> Result<User> {
    let (
        id,
        email,
        username,
        first_name,
        last_name,
        password_hash,
        is_active,
        is_staff,
        created_at,
        updated_at,
    ) = row;

    Ok(User {
        id: Some(id),
        email,
        username,
        first_name,
        last_name,
        password_hash,
        is_active,
        is_staff,
        created_at: parse_utc(&created_at)?,
        updated_at: parse_utc(&updated_at)?,
    })
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<i64> {
        if let Err(e) = user.is_valid() {
            return Err(anyhow::anyhow!("Invalid user: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, username, first_name, last_name, password_hash, is_active, is_staff, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by id")?;

        row.map(map_row).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by email")?;

        row.map(map_row).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by username")?;

        row.map(map_row).transpose()
    }

    /// Persist every mutable field of an existing user
    pub async fn update(&self, user: &User) -> Result<()> {
        let id = user
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update user without an id"))?;

        if let Err(e) = user.is_valid() {
            return Err(anyhow::anyhow!("Invalid user: {}", e));
        }

        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET email = ?, username = ?, first_name = ?, last_name = ?,
                password_hash = ?, is_active = ?, is_staff = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("User not found"));
        }

        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY username",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.into_iter().map(map_row).collect()
    }
}
