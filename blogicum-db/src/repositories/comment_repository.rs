use anyhow::{Context, Result};
use blogicum_core::models::comment::{Comment, CommentDetail};
use sqlx::SqlitePool;

use crate::datetime::parse_utc;

type CommentRow = (i64, i64, i64, String, String, String);

const COMMENT_COLUMNS: &str = "id, post_id, author_id, text, created_at, updated_at";

fn map_row(row: CommentRow) -> Result<Comment> {
    let (id, post_id, author_id, text, created_at, updated_at) = row;

    Ok(Comment {
        id: Some(id),
        post_id,
        author_id,
        text,
        created_at: parse_utc(&created_at)?,
        updated_at: parse_utc(&updated_at)?,
    })
}

pub struct CommentRepository {
    pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, comment: &Comment) -> Result<i64> {
        if let Err(e) = comment.is_valid() {
            return Err(anyhow::anyhow!("Invalid comment: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO comments (post_id, author_id, text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {} FROM comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find comment by id")?;

        row.map(map_row).transpose()
    }

    /// Comments on a post in the order they were written, with author names
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentDetail>> {
        let rows = sqlx::query_as::<_, (i64, i64, i64, String, String, String, String)>(
            r#"
            SELECT c.id, c.post_id, c.author_id, c.text, c.created_at, c.updated_at, u.username
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments for post")?;

        rows.into_iter()
            .map(|(id, post_id, author_id, text, created_at, updated_at, username)| {
                Ok(CommentDetail {
                    comment: Comment {
                        id: Some(id),
                        post_id,
                        author_id,
                        text,
                        created_at: parse_utc(&created_at)?,
                        updated_at: parse_utc(&updated_at)?,
                    },
                    author_username: username,
                })
            })
            .collect()
    }

    pub async fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count comments for post")?;

        Ok(count)
    }

    pub async fn update(&self, comment: &Comment) -> Result<()> {
        let id = comment
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update comment without an id"))?;

        if let Err(e) = comment.is_valid() {
            return Err(anyhow::anyhow!("Invalid comment: {}", e));
        }

        let rows_affected = sqlx::query("UPDATE comments SET text = ?, updated_at = ? WHERE id = ?")
            .bind(&comment.text)
            .bind(comment.updated_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update comment")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Comment not found"));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Comment not found"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{PostRepository, UserRepository};
    use crate::schema::create_schema;
    use blogicum_core::models::post::Post;
    use blogicum_core::models::user::User;
    use chrono::Utc;

    async fn setup() -> Result<(SqlitePool, i64, i64)> {
        let pool = SqlitePool::connect(":memory:").await?;
        create_schema(&pool).await?;

        let user = User::new(
            "author@example.com".to_string(),
            "author".to_string(),
            "password123",
        )?;
        let author_id = UserRepository::new(pool.clone()).create(&user).await?;

        let post = Post::new("A post".to_string(), "body".to_string(), author_id);
        let post_id = PostRepository::new(pool.clone()).create(&post).await?;

        Ok((pool, author_id, post_id))
    }

    #[sqlx::test]
    async fn test_create_and_find() -> Result<()> {
        let (pool, author_id, post_id) = setup().await?;
        let repo = CommentRepository::new(pool);

        let id = repo
            .create(&Comment::new(post_id, author_id, "Nice post".to_string()))
            .await?;

        let found = repo.find_by_id(id).await?.unwrap();
        assert_eq!(found.post_id, post_id);
        assert_eq!(found.author_id, author_id);
        assert_eq!(found.text, "Nice post");

        Ok(())
    }

    #[sqlx::test]
    async fn test_create_empty_text_fails() -> Result<()> {
        let (pool, author_id, post_id) = setup().await?;
        let repo = CommentRepository::new(pool);

        let result = repo
            .create(&Comment::new(post_id, author_id, "  ".to_string()))
            .await;
        assert!(result.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_create_on_missing_post_fails() -> Result<()> {
        let (pool, author_id, _) = setup().await?;
        let repo = CommentRepository::new(pool);

        let result = repo
            .create(&Comment::new(999, author_id, "orphan".to_string()))
            .await;
        assert!(result.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_for_post_in_creation_order() -> Result<()> {
        let (pool, author_id, post_id) = setup().await?;
        let repo = CommentRepository::new(pool);

        repo.create(&Comment::new(post_id, author_id, "first".to_string()))
            .await?;
        repo.create(&Comment::new(post_id, author_id, "second".to_string()))
            .await?;

        let comments = repo.list_for_post(post_id).await?;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].comment.text, "first");
        assert_eq!(comments[1].comment.text, "second");
        assert_eq!(comments[0].author_username, "author");

        assert_eq!(repo.count_for_post(post_id).await?, 2);

        Ok(())
    }

    #[sqlx::test]
    async fn test_update_comment() -> Result<()> {
        let (pool, author_id, post_id) = setup().await?;
        let repo = CommentRepository::new(pool);

        let id = repo
            .create(&Comment::new(post_id, author_id, "before".to_string()))
            .await?;

        let mut comment = repo.find_by_id(id).await?.unwrap();
        comment.text = "after".to_string();
        comment.updated_at = Utc::now();
        repo.update(&comment).await?;

        let found = repo.find_by_id(id).await?.unwrap();
        assert_eq!(found.text, "after");

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_comment() -> Result<()> {
        let (pool, author_id, post_id) = setup().await?;
        let repo = CommentRepository::new(pool);

        let id = repo
            .create(&Comment::new(post_id, author_id, "gone".to_string()))
            .await?;

        repo.delete(id).await?;
        assert!(repo.find_by_id(id).await?.is_none());
        assert!(repo.delete(id).await.is_err());

        Ok(())
    }
}
