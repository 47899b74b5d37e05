use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question: String,
    pub answer: String,
    pub note: Option<String>,
    pub is_pinned: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Question {
    /// Bulk-insert question/answer pairs into a session.
    pub async fn insert_many(
        db: &PgPool,
        session_id: Uuid,
        pairs: &[(String, String)],
    ) -> anyhow::Result<Vec<Question>> {
        let mut out = Vec::with_capacity(pairs.len());
        let mut tx = db.begin().await?;
        for (question, answer) in pairs {
            let row = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (session_id, question, answer)
                VALUES ($1, $2, $3)
                RETURNING id, session_id, question, answer, note, is_pinned,
                          created_at, updated_at
                "#,
            )
            .bind(session_id)
            .bind(question)
            .bind(answer)
            .fetch_one(&mut *tx)
            .await?;
            out.push(row);
        }
        tx.commit().await?;
        Ok(out)
    }

    /// Questions of a session, pinned first, then oldest first.
    pub async fn list_by_session(db: &PgPool, session_id: Uuid) -> anyhow::Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, session_id, question, answer, note, is_pinned,
                   created_at, updated_at
            FROM questions
            WHERE session_id = $1
            ORDER BY is_pinned DESC, created_at ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Fetch a question only if its parent session belongs to `user_id`.
    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        question_id: Uuid,
    ) -> anyhow::Result<Option<Question>> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.session_id, q.question, q.answer, q.note, q.is_pinned,
                   q.created_at, q.updated_at
            FROM questions q
            JOIN sessions s ON s.id = q.session_id
            WHERE q.id = $1 AND s.user_id = $2
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn toggle_pin(db: &PgPool, question_id: Uuid) -> anyhow::Result<Question> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET is_pinned = NOT is_pinned, updated_at = now()
            WHERE id = $1
            RETURNING id, session_id, question, answer, note, is_pinned,
                      created_at, updated_at
            "#,
        )
        .bind(question_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn set_note(
        db: &PgPool,
        question_id: Uuid,
        note: Option<&str>,
    ) -> anyhow::Result<Question> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET note = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, session_id, question, answer, note, is_pinned,
                      created_at, updated_at
            "#,
        )
        .bind(question_id)
        .bind(note)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
