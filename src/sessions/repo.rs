use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub experience: String,
    pub topics_to_focus: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Session row joined with its question count, for the list view.
#[derive(Debug, Clone, FromRow)]
pub struct SessionListRow {
    pub id: Uuid,
    pub role: String,
    pub experience: String,
    pub topics_to_focus: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub question_count: i64,
}

impl Session {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        role: &str,
        experience: &str,
        topics_to_focus: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, role, experience, topics_to_focus, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, role, experience, topics_to_focus, description,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .bind(experience)
        .bind(topics_to_focus)
        .bind(description)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<SessionListRow>> {
        let rows = sqlx::query_as::<_, SessionListRow>(
            r#"
            SELECT s.id, s.role, s.experience, s.topics_to_focus, s.description,
                   s.created_at,
                   COUNT(q.id) AS question_count
            FROM sessions s
            LEFT JOIN questions q ON q.session_id = s.id
            WHERE s.user_id = $1
            GROUP BY s.id
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Fetch a session only if it belongs to `user_id`. A foreign session
    /// comes back as `None`, same as a missing one.
    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, role, experience, topics_to_focus, description,
                   created_at, updated_at
            FROM sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    /// Delete a session and its questions. Returns false when no owned
    /// session matched. The schema has no cascade; both deletes run in one
    /// transaction.
    pub async fn delete_owned(
        db: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM questions
            WHERE session_id IN (
                SELECT id FROM sessions WHERE id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(r#"DELETE FROM sessions WHERE id = $1 AND user_id = $2"#)
            .bind(session_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
