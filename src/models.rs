use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Admin
///
/// The administrator record stored in the `admins` table. Seeded once at startup
/// and never modified through the API. The hash is a PHC string (Argon2id).
#[derive(Debug, Clone, FromRow, Default)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}

impl Admin {
    /// The public part of the record, safe to serialize and to store in a session.
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// AdminProfile
///
/// `{id, email}` as returned by `/admin.login` and `/admin.current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminProfile {
    pub id: i32,
    pub email: String,
}

/// Session
///
/// A row of `admin_sessions`. The `id` is the value of the `session_id` cookie;
/// `admin_id` and `email` are the identity captured at login time.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub admin_id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn admin(&self) -> AdminProfile {
        AdminProfile {
            id: self.admin_id,
            email: self.email.clone(),
        }
    }
}

/// Theme
///
/// A topic grouping questions (`themes` table). Titles are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Theme {
    pub id: i32,
    pub title: String,
}

/// Answer
///
/// One option of a question. Used both as request input and in responses;
/// the storage id and `question_id` are not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Answer {
    pub title: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn new(title: impl Into<String>, is_correct: bool) -> Self {
        Self {
            title: title.into(),
            is_correct,
        }
    }
}

/// Question
///
/// A question assembled with its answers. In storage the answers live in their
/// own table and are joined in by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Question {
    pub id: i32,
    pub title: String,
    pub theme_id: i32,
    pub answers: Vec<Answer>,
}

/// Raw `questions` row, before answers are attached.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub title: String,
    pub theme_id: i32,
}

impl QuestionRow {
    pub fn with_answers(self, answers: Vec<Answer>) -> Question {
        Question {
            id: self.id,
            title: self.title,
            theme_id: self.theme_id,
            answers,
        }
    }
}

/// Raw `answers` row as loaded in batch for a set of questions.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerRow {
    pub question_id: i32,
    pub title: String,
    pub is_correct: bool,
}

/// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for `POST /admin.login`. The password is only compared against
/// the stored hash and never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    #[schema(example = "admin@admin.com")]
    pub email: String,
    pub password: String,
}

/// CreateThemeRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateThemeRequest {
    #[schema(example = "Geography")]
    pub title: String,
}

/// CreateQuestionRequest
///
/// Input payload for `POST /question.add`. The answers are checked by
/// [`crate::validation::answers_are_valid`] before anything is written.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateQuestionRequest {
    #[schema(example = "What is the capital of France?")]
    pub title: String,
    pub theme_id: i32,
    pub answers: Vec<Answer>,
}

/// --- List Envelopes (Output Schemas) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ThemeListResponse {
    pub themes: Vec<Theme>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct QuestionListResponse {
    pub questions: Vec<Question>,
}
