use anyhow::{Context, Result};
use blogicum_core::models::session::Session;
use sqlx::SqlitePool;

use crate::datetime::parse_utc;

type SessionRow = (String, i64, String, String);

fn map_row(row: SessionRow) -> Result<Session> {
    let (id, user_id, expires_at, created_at) = row;

    Ok(Session {
        id,
        user_id,
        expires_at: parse_utc(&expires_at)?,
        created_at: parse_utc(&created_at)?,
    })
}

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create session")?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, expires_at, created_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find session by id")?;

        row.map(map_row).transpose()
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, expires_at, created_at FROM sessions WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find sessions by user_id")?;

        rows.into_iter().map(map_row).collect()
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Session not found"));
        }

        Ok(())
    }

    pub async fn delete_expired(&self) -> Result<u64> {
        let now = chrono::Utc::now();

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::UserRepository;
    use crate::schema::create_schema;
    use blogicum_core::models::user::User;
    use chrono::Duration;

    async fn setup() -> Result<(SqlitePool, i64)> {
        let pool = SqlitePool::connect(":memory:").await?;
        create_schema(&pool).await?;

        let user = User::new(
            "test@example.com".to_string(),
            "testuser".to_string(),
            "password123",
        )?;
        let user_id = UserRepository::new(pool.clone()).create(&user).await?;

        Ok((pool, user_id))
    }

    #[sqlx::test]
    async fn test_create_and_find() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;

        let found = repo.find_by_id(&session.id).await?.unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.user_id, user_id);

        Ok(())
    }

    #[sqlx::test]
    async fn test_create_duplicate_id_fails() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;

        assert!(repo.create(&session).await.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_create_for_missing_user_fails() -> Result<()> {
        let (pool, _) = setup().await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(999);
        assert!(repo.create(&session).await.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_find_by_user_id() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        repo.create(&Session::new(user_id)).await?;
        repo.create(&Session::new(user_id)).await?;

        let sessions = repo.find_by_user_id(user_id).await?;
        assert_eq!(sessions.len(), 2);

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;

        repo.delete(&session.id).await?;
        assert!(repo.find_by_id(&session.id).await?.is_none());
        assert!(repo.delete(&session.id).await.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_expired() -> Result<()> {
        let (pool, user_id) = setup().await?;
        let repo = SessionRepository::new(pool);

        let expired = Session::new_with_expiry(user_id, Duration::hours(-1));
        let live = Session::new(user_id);
        repo.create(&expired).await?;
        repo.create(&live).await?;

        let deleted = repo.delete_expired().await?;
        assert_eq!(deleted, 1);
        assert!(repo.find_by_id(&expired.id).await?.is_none());
        assert!(repo.find_by_id(&live.id).await?.is_some());

        Ok(())
    }
}
