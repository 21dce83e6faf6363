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
use blogicum_core::models::post::{Post, PostDetail, PostSummary};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::datetime::parse_utc;

type PostRow = (
    i64,            // id
    String,         // title
    String,         // text
    Option<String>, // image
    String,         // pub_date
    i64,            // author_id
    Option<i64>,    // category_id
    bool,           // is_published
    String,         // created_at
    String,         // updated_at
);

type SummaryRow = (
    i64,            // id
    String,         // title
    String,         // text
    Option<String>, // image
    String,         // pub_date
    bool,           // is_published
    String,         // author username
    Option<String>, // category title
    Option<String>, // category slug
    i64,            // comment count
);

const POST_COLUMNS: &str =
    "id, title, text, image, pub_date, author_id, category_id, is_published, created_at, updated_at";

/// Listing projection shared by the index, category, and profile queries.
/// The comment count is a correlated subquery; the caller supplies the
/// JOIN/WHERE tail.
const SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.title, p.text, p.image, p.pub_date, p.is_published,
           u.username, c.title, c.slug,
           (SELECT COUNT(*) FROM comments WHERE comments.post_id = p.id)
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

/// The public-visibility invariant in SQL. The category join is inner, so
/// posts without a category never qualify.
const VISIBLE_WHERE: &str = "p.is_published = 1 AND p.pub_date <= ? AND c.is_published = 1";

fn map_post_row(row: PostRow) -> Result<Post> {
    let (id, title, text, image, pub_date, author_id, category_id, is_published, created_at, updated_at) =
        row;

    Ok(Post {
        id: Some(id),
        title,
        text,
        image,
        pub_date: parse_utc(&pub_date)?,
        author_id,
        category_id,
        is_published,
        created_at: parse_utc(&created_at)?,
        updated_at: parse_utc(&updated_at)?,
    })
}

fn map_summary_row(row: SummaryRow) -> Result<PostSummary> {
    let (
        id,
        title,
        text,
        image,
        pub_date,
        is_published,
        author_username,
        category_title,
        category_slug,
        comment_count,
    ) = row;

    Ok(PostSummary {
        id,
        title,
        text,
        image,
        pub_date: parse_utc(&pub_date)?,
        is_published,
        author_username,
        category_title,
        category_slug,
        comment_count,
    })
}

pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, post: &Post) -> Result<i64> {
        if let Err(e) = post.is_valid() {
            return Err(anyhow::anyhow!("Invalid post: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, text, image, pub_date, author_id, category_id, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(&post.image)
        .bind(post.pub_date)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(post.is_published)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM posts WHERE id = ?",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find post by id")?;

        row.map(map_post_row).transpose()
    }

    /// Fetch a post joined with its author's username and full category,
    /// for the detail page
    pub async fn find_detail(&self, id: i64) -> Result<Option<PostDetail>> {
        let Some(post) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let (author_username,): (String,) =
            sqlx::query_as("SELECT username FROM users WHERE id = ?")
                .bind(post.author_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to load post author")?;

        let category = match post.category_id {
            Some(category_id) => {
                let row: Option<(i64, String, String, String, bool, String)> = sqlx::query_as(
                    "SELECT id, slug, title, description, is_published, created_at FROM categories WHERE id = ?",
                )
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to load post category")?;

                match row {
                    Some((id, slug, title, description, is_published, created_at)) => {
                        Some(Category {
                            id: Some(id),
                            slug,
                            title,
                            description,
                            is_published,
                            created_at: parse_utc(&created_at)?,
                        })
                    }
                    None => None,
                }
            }
            None => None,
        };

        Ok(Some(PostDetail {
            post,
            author_username,
            category,
        }))
    }

    pub async fn update(&self, post: &Post) -> Result<()> {
        let id = post
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update post without an id"))?;

        if let Err(e) = post.is_valid() {
            return Err(anyhow::anyhow!("Invalid post: {}", e));
        }

        let rows_affected = sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, text = ?, image = ?, pub_date = ?, category_id = ?,
                is_published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(&post.image)
        .bind(post.pub_date)
        .bind(post.category_id)
        .bind(post.is_published)
        .bind(post.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Post not found"));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Post not found"));
        }

        Ok(())
    }

    /// Publicly visible posts, newest first, for the index page
    pub async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT} JOIN categories c ON c.id = p.category_id \
             WHERE {VISIBLE_WHERE} ORDER BY p.pub_date DESC LIMIT ? OFFSET ?"
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list published posts")?;

        rows.into_iter().map(map_summary_row).collect()
    }

    pub async fn count_published(&self, now: DateTime<Utc>) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM posts p JOIN categories c ON c.id = p.category_id \
             WHERE {VISIBLE_WHERE}"
        ))
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count published posts")?;

        Ok(count)
    }

    /// Published, due posts in one category, newest first. The category's
    /// own published flag is checked by the caller (unknown or unpublished
    /// categories 404 before any listing happens).
    pub async fn list_in_category(
        &self,
        category_id: i64,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT} JOIN categories c ON c.id = p.category_id \
             WHERE p.category_id = ? AND p.is_published = 1 AND p.pub_date <= ? \
             ORDER BY p.pub_date DESC LIMIT ? OFFSET ?"
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(category_id)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list posts in category")?;

        rows.into_iter().map(map_summary_row).collect()
    }

    pub async fn count_in_category(&self, category_id: i64, now: DateTime<Utc>) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE category_id = ? AND is_published = 1 AND pub_date <= ?",
        )
        .bind(category_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count posts in category")?;

        Ok(count)
    }

    /// Every post by one author, newest first, visibility ignored. The
    /// profile page is the author's full archive.
    pub async fn list_by_author(
        &self,
        author_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT} LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.author_id = ? ORDER BY p.pub_date DESC LIMIT ? OFFSET ?"
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list posts by author")?;

        rows.into_iter().map(map_summary_row).collect()
    }

    pub async fn count_by_author(&self, author_id: i64) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count posts by author")?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{CategoryRepository, CommentRepository, UserRepository};
    use crate::schema::create_schema;
    use blogicum_core::models::comment::Comment;
    use blogicum_core::models::user::User;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    async fn setup() -> Result<SqlitePool> {
        let pool = SqlitePool::connect(":memory:").await?;
        create_schema(&pool).await?;
        Ok(pool)
    }

    async fn create_author(pool: &SqlitePool, username: &str) -> Result<i64> {
        let user = User::new(
            format!("{}@example.com", username),
            username.to_string(),
            "password123",
        )?;
        UserRepository::new(pool.clone()).create(&user).await
    }

    async fn create_category(pool: &SqlitePool, title: &str, published: bool) -> Result<i64> {
        let mut category = Category::new(title.to_string(), None);
        category.is_published = published;
        CategoryRepository::new(pool.clone()).create(&category).await
    }

    fn make_post(author_id: i64, category_id: Option<i64>, title: &str) -> Post {
        let mut post = Post::new(title.to_string(), "body".to_string(), author_id);
        post.category_id = category_id;
        post
    }

    #[sqlx::test]
    async fn test_create_and_find_roundtrip() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let category_id = create_category(&pool, "Travel", true).await?;
        let repo = PostRepository::new(pool);

        let post = make_post(author_id, Some(category_id), "First post");
        let id = repo.create(&post).await?;

        let found = repo.find_by_id(id).await?.unwrap();
        assert_eq!(found.title, "First post");
        assert_eq!(found.author_id, author_id);
        assert_eq!(found.category_id, Some(category_id));
        assert!(found.is_published);

        Ok(())
    }

    #[sqlx::test]
    async fn test_create_invalid_post_fails() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let repo = PostRepository::new(pool);

        let post = make_post(author_id, None, "");
        assert!(repo.create(&post).await.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_published_applies_visibility() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let visible_cat = create_category(&pool, "Visible", true).await?;
        let hidden_cat = create_category(&pool, "Hidden", false).await?;
        let repo = PostRepository::new(pool);
        let now = Utc::now();

        // Qualifies
        let mut qualifies = make_post(author_id, Some(visible_cat), "ok");
        qualifies.pub_date = now - Duration::seconds(1);
        repo.create(&qualifies).await?;

        // Unpublished post
        let mut unpublished = make_post(author_id, Some(visible_cat), "draft");
        unpublished.is_published = false;
        repo.create(&unpublished).await?;

        // Scheduled in the future
        let mut scheduled = make_post(author_id, Some(visible_cat), "scheduled");
        scheduled.pub_date = now + Duration::days(1);
        repo.create(&scheduled).await?;

        // Unpublished category
        repo.create(&make_post(author_id, Some(hidden_cat), "hidden-cat")).await?;

        // No category
        repo.create(&make_post(author_id, None, "uncategorized")).await?;

        let posts = repo.list_published(now, 10, 0).await?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "ok");
        assert_eq!(posts[0].author_username, "author");
        assert_eq!(posts[0].category_title.as_deref(), Some("Visible"));

        assert_eq!(repo.count_published(now).await?, 1);

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_published_newest_first_with_counts() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let reader_id = create_author(&pool, "reader").await?;
        let category_id = create_category(&pool, "Travel", true).await?;
        let repo = PostRepository::new(pool.clone());
        let now = Utc::now();

        let mut older = make_post(author_id, Some(category_id), "older");
        older.pub_date = now - Duration::days(2);
        let older_id = repo.create(&older).await?;

        let mut newer = make_post(author_id, Some(category_id), "newer");
        newer.pub_date = now - Duration::days(1);
        repo.create(&newer).await?;

        let comment_repo = CommentRepository::new(pool);
        comment_repo
            .create(&Comment::new(older_id, reader_id, "first".to_string()))
            .await?;
        comment_repo
            .create(&Comment::new(older_id, author_id, "second".to_string()))
            .await?;

        let posts = repo.list_published(now, 10, 0).await?;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "newer");
        assert_eq!(posts[0].comment_count, 0);
        assert_eq!(posts[1].title, "older");
        assert_eq!(posts[1].comment_count, 2);

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_published_pagination() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let category_id = create_category(&pool, "Travel", true).await?;
        let repo = PostRepository::new(pool);
        let now = Utc::now();

        for i in 0..15 {
            let mut post = make_post(author_id, Some(category_id), &format!("post-{i}"));
            post.pub_date = now - Duration::hours(i);
            repo.create(&post).await?;
        }

        let first_page = repo.list_published(now, 10, 0).await?;
        assert_eq!(first_page.len(), 10);
        assert_eq!(first_page[0].title, "post-0");

        let second_page = repo.list_published(now, 10, 10).await?;
        assert_eq!(second_page.len(), 5);
        assert_eq!(second_page[0].title, "post-10");

        assert_eq!(repo.count_published(now).await?, 15);

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_in_category() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let travel = create_category(&pool, "Travel", true).await?;
        let news = create_category(&pool, "News", true).await?;
        let repo = PostRepository::new(pool);
        let now = Utc::now();

        let mut travel_post = make_post(author_id, Some(travel), "travel post");
        travel_post.pub_date = now - Duration::seconds(1);
        repo.create(&travel_post).await?;
        repo.create(&make_post(author_id, Some(news), "news post")).await?;

        let mut draft = make_post(author_id, Some(travel), "travel draft");
        draft.is_published = false;
        repo.create(&draft).await?;

        let posts = repo.list_in_category(travel, now, 10, 0).await?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "travel post");
        assert_eq!(repo.count_in_category(travel, now).await?, 1);

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_by_author_ignores_visibility() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let other_id = create_author(&pool, "other").await?;
        let repo = PostRepository::new(pool);
        let now = Utc::now();

        let mut draft = make_post(author_id, None, "draft");
        draft.is_published = false;
        repo.create(&draft).await?;

        let mut scheduled = make_post(author_id, None, "scheduled");
        scheduled.pub_date = now + Duration::days(3);
        repo.create(&scheduled).await?;

        repo.create(&make_post(other_id, None, "not mine")).await?;

        let posts = repo.list_by_author(author_id, 10, 0).await?;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "scheduled");
        assert_eq!(posts[1].title, "draft");
        assert!(posts[0].category_title.is_none());

        assert_eq!(repo.count_by_author(author_id).await?, 2);

        Ok(())
    }

    #[sqlx::test]
    async fn test_find_detail() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let category_id = create_category(&pool, "Travel", true).await?;
        let repo = PostRepository::new(pool);

        let id = repo
            .create(&make_post(author_id, Some(category_id), "with category"))
            .await?;

        let detail = repo.find_detail(id).await?.unwrap();
        assert_eq!(detail.post.title, "with category");
        assert_eq!(detail.author_username, "author");
        assert_eq!(detail.category.as_ref().unwrap().title, "Travel");

        let bare_id = repo.create(&make_post(author_id, None, "bare")).await?;
        let bare = repo.find_detail(bare_id).await?.unwrap();
        assert!(bare.category.is_none());

        assert!(repo.find_detail(9999).await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_update_post() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let repo = PostRepository::new(pool);

        let id = repo.create(&make_post(author_id, None, "before")).await?;

        let mut post = repo.find_by_id(id).await?.unwrap();
        post.title = "after".to_string();
        post.is_published = false;
        post.updated_at = Utc::now();
        repo.update(&post).await?;

        let found = repo.find_by_id(id).await?.unwrap();
        assert_eq!(found.title, "after");
        assert!(!found.is_published);

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_post_cascades_comments() -> Result<()> {
        let pool = setup().await?;
        let author_id = create_author(&pool, "author").await?;
        let repo = PostRepository::new(pool.clone());

        let id = repo.create(&make_post(author_id, None, "doomed")).await?;

        let comment_repo = CommentRepository::new(pool.clone());
        comment_repo
            .create(&Comment::new(id, author_id, "gone soon".to_string()))
            .await?;

        repo.delete(id).await?;
        assert!(repo.find_by_id(id).await?.is_none());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_missing_post_fails() -> Result<()> {
        let pool = setup().await?;
        let repo = PostRepository::new(pool);

        assert!(repo.delete(12345).await.is_err());

        Ok(())
    }
}
