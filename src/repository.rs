use crate::models::{Admin, AdminProfile, Answer, AnswerRow, Question, QuestionRow, Session, Theme};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// RepoError
///
/// Failures surfaced by the persistence layer. Constraint violations are split
/// out from generic driver errors so the HTTP layer can answer 409/404 instead
/// of 500 when two requests race on the same unique title.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint rejected the write (SQLSTATE 23505).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist (SQLSTATE 23503).
    #[error("referenced row is missing: {0}")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return RepoError::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::MissingReference(constraint);
            }
        }
        RepoError::Database(err)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository Trait
///
/// The abstract contract for every persistence operation. Handlers and the auth
/// gate only ever see `Arc<dyn Repository>`, so tests can swap in an in-memory
/// implementation.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Admins ---
    async fn get_admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>>;
    async fn create_admin(&self, email: &str, password_hash: &str) -> RepoResult<Admin>;

    // --- Sessions ---
    async fn create_session(
        &self,
        admin: &AdminProfile,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session>;
    /// Returns the session only while it has not expired.
    async fn get_session(&self, id: Uuid) -> RepoResult<Option<Session>>;
    async fn delete_session(&self, id: Uuid) -> RepoResult<()>;

    // --- Themes ---
    async fn create_theme(&self, title: &str) -> RepoResult<Theme>;
    async fn get_theme_by_id(&self, id: i32) -> RepoResult<Option<Theme>>;
    async fn get_theme_by_title(&self, title: &str) -> RepoResult<Option<Theme>>;
    async fn list_themes(&self) -> RepoResult<Vec<Theme>>;

    // --- Questions ---
    /// Inserts the question and all of its answers atomically.
    async fn create_question(
        &self,
        title: &str,
        theme_id: i32,
        answers: &[Answer],
    ) -> RepoResult<Question>;
    async fn get_question_by_title(&self, title: &str) -> RepoResult<Option<Question>>;
    async fn list_questions(&self, theme_id: Option<i32>) -> RepoResult<Vec<Question>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the answers of every question in `ids` with a single query and
    /// groups them by question id.
    async fn answers_for(&self, ids: &[i32]) -> RepoResult<HashMap<i32, Vec<Answer>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"SELECT question_id, title, is_correct
               FROM answers
               WHERE question_id = ANY($1)
               ORDER BY id"#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<Answer>> = HashMap::new();
        for row in rows {
            grouped.entry(row.question_id).or_default().push(Answer {
                title: row.title,
                is_correct: row.is_correct,
            });
        }
        Ok(grouped)
    }

    async fn assemble(&self, rows: Vec<QuestionRow>) -> RepoResult<Vec<Question>> {
        let ids: Vec<i32> = rows.iter().map(|q| q.id).collect();
        let mut answers = self.answers_for(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let own = answers.remove(&row.id).unwrap_or_default();
                row.with_answers(own)
            })
            .collect())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn create_admin(&self, email: &str, password_hash: &str) -> RepoResult<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (email, password_hash) VALUES ($1, $2) RETURNING id, email, password_hash",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }

    /// create_session
    ///
    /// Issues a fresh random session id. Expired rows of the same admin are
    /// purged on the way so the table does not grow without bound.
    async fn create_session(
        &self,
        admin: &AdminProfile,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session> {
        sqlx::query("DELETE FROM admin_sessions WHERE admin_id = $1 AND expires_at <= NOW()")
            .bind(admin.id)
            .execute(&self.pool)
            .await?;

        let session = sqlx::query_as::<_, Session>(
            r#"INSERT INTO admin_sessions (id, admin_id, email, expires_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, admin_id, email, created_at, expires_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(admin.id)
        .bind(&admin.email)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> RepoResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"SELECT id, admin_id, email, created_at, expires_at
               FROM admin_sessions
               WHERE id = $1 AND expires_at > NOW()"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete_session(&self, id: Uuid) -> RepoResult<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_theme(&self, title: &str) -> RepoResult<Theme> {
        let theme = sqlx::query_as::<_, Theme>(
            "INSERT INTO themes (title) VALUES ($1) RETURNING id, title",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(theme)
    }

    async fn get_theme_by_id(&self, id: i32) -> RepoResult<Option<Theme>> {
        let theme = sqlx::query_as::<_, Theme>("SELECT id, title FROM themes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(theme)
    }

    async fn get_theme_by_title(&self, title: &str) -> RepoResult<Option<Theme>> {
        let theme = sqlx::query_as::<_, Theme>("SELECT id, title FROM themes WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(theme)
    }

    async fn list_themes(&self) -> RepoResult<Vec<Theme>> {
        let themes = sqlx::query_as::<_, Theme>("SELECT id, title FROM themes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(themes)
    }

    /// create_question
    ///
    /// The question row and its answers go through one transaction: if any answer
    /// insert fails (e.g. a duplicate answer title) the question is rolled back too.
    async fn create_question(
        &self,
        title: &str,
        theme_id: i32,
        answers: &[Answer],
    ) -> RepoResult<Question> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, QuestionRow>(
            "INSERT INTO questions (title, theme_id) VALUES ($1, $2) RETURNING id, title, theme_id",
        )
        .bind(title)
        .bind(theme_id)
        .fetch_one(&mut *tx)
        .await?;

        if !answers.is_empty() {
            let mut builder: QueryBuilder<sqlx::Postgres> =
                QueryBuilder::new("INSERT INTO answers (title, is_correct, question_id) ");
            builder.push_values(answers, |mut b, answer| {
                b.push_bind(answer.title.clone())
                    .push_bind(answer.is_correct)
                    .push_bind(row.id);
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(row.with_answers(answers.to_vec()))
    }

    async fn get_question_by_title(&self, title: &str) -> RepoResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, title, theme_id FROM questions WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// list_questions
    ///
    /// Optional theme filter built with `QueryBuilder`; answers are attached with
    /// one batched lookup instead of one query per question.
    async fn list_questions(&self, theme_id: Option<i32>) -> RepoResult<Vec<Question>> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT id, title, theme_id FROM questions");

        if let Some(theme_id) = theme_id {
            builder.push(" WHERE theme_id = ");
            builder.push_bind(theme_id);
        }

        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<QuestionRow>()
            .fetch_all(&self.pool)
            .await?;

        self.assemble(rows).await
    }
}
