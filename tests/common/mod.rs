#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, header},
};
use chrono::{DateTime, Duration, Utc};
use quiz_admin::{
    AppConfig, AppState,
    models::{Admin, AdminProfile, Answer, Question, Session, Theme},
    password,
    repository::{RepoError, RepoResult, Repository},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@admin.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

#[derive(Default)]
struct Tables {
    admins: Vec<Admin>,
    sessions: Vec<Session>,
    themes: Vec<Theme>,
    questions: Vec<Question>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// InMemoryRepository
///
/// A `Repository` that keeps everything in memory and emulates the unique and
/// foreign key constraints of the Postgres schema. `calls()` counts every
/// trait method invocation, so tests can assert the store was never touched.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository with the standard admin already seeded.
    pub fn with_admin() -> Self {
        let repo = Self::new();
        let hash = password::hash_password(ADMIN_PASSWORD).unwrap();
        {
            let mut t = repo.tables.lock().unwrap();
            let id = t.next_id();
            t.admins.push(Admin {
                id,
                email: ADMIN_EMAIL.to_string(),
                password_hash: hash,
            });
        }
        repo
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn admin(&self) -> Admin {
        self.tables.lock().unwrap().admins[0].clone()
    }

    /// Opens a session directly, bypassing login.
    pub fn open_session(&self, admin: &AdminProfile, expires_at: DateTime<Utc>) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            admin_id: admin.id,
            email: admin.email.clone(),
            created_at: Utc::now(),
            expires_at,
        };
        self.tables.lock().unwrap().sessions.push(session.clone());
        session
    }

    /// Removes every admin, leaving sessions dangling.
    pub fn drop_admins(&self) {
        self.tables.lock().unwrap().admins.clear();
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().unwrap().sessions.len()
    }

    pub fn theme_count(&self) -> usize {
        self.tables.lock().unwrap().themes.len()
    }

    pub fn question_count(&self) -> usize {
        self.tables.lock().unwrap().questions.len()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        self.hit();
        let t = self.tables.lock().unwrap();
        Ok(t.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn create_admin(&self, email: &str, password_hash: &str) -> RepoResult<Admin> {
        self.hit();
        let mut t = self.tables.lock().unwrap();
        if t.admins.iter().any(|a| a.email == email) {
            return Err(RepoError::Conflict("admins_email_key".into()));
        }
        let id = t.next_id();
        let admin = Admin {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        t.admins.push(admin.clone());
        Ok(admin)
    }

    async fn create_session(
        &self,
        admin: &AdminProfile,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session> {
        self.hit();
        let mut t = self.tables.lock().unwrap();
        if !t.admins.iter().any(|a| a.id == admin.id) {
            return Err(RepoError::MissingReference("admin_sessions_admin_id_fkey".into()));
        }
        let session = Session {
            id: Uuid::new_v4(),
            admin_id: admin.id,
            email: admin.email.clone(),
            created_at: Utc::now(),
            expires_at,
        };
        t.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> RepoResult<Option<Session>> {
        self.hit();
        let t = self.tables.lock().unwrap();
        let now = Utc::now();
        Ok(t.sessions
            .iter()
            .find(|s| s.id == id && s.expires_at > now)
            .cloned())
    }

    async fn delete_session(&self, id: Uuid) -> RepoResult<()> {
        self.hit();
        self.tables.lock().unwrap().sessions.retain(|s| s.id != id);
        Ok(())
    }

    async fn create_theme(&self, title: &str) -> RepoResult<Theme> {
        self.hit();
        let mut t = self.tables.lock().unwrap();
        if t.themes.iter().any(|th| th.title == title) {
            return Err(RepoError::Conflict("themes_title_key".into()));
        }
        let id = t.next_id();
        let theme = Theme {
            id,
            title: title.to_string(),
        };
        t.themes.push(theme.clone());
        Ok(theme)
    }

    async fn get_theme_by_id(&self, id: i32) -> RepoResult<Option<Theme>> {
        self.hit();
        let t = self.tables.lock().unwrap();
        Ok(t.themes.iter().find(|th| th.id == id).cloned())
    }

    async fn get_theme_by_title(&self, title: &str) -> RepoResult<Option<Theme>> {
        self.hit();
        let t = self.tables.lock().unwrap();
        Ok(t.themes.iter().find(|th| th.title == title).cloned())
    }

    async fn list_themes(&self) -> RepoResult<Vec<Theme>> {
        self.hit();
        Ok(self.tables.lock().unwrap().themes.clone())
    }

    async fn create_question(
        &self,
        title: &str,
        theme_id: i32,
        answers: &[Answer],
    ) -> RepoResult<Question> {
        self.hit();
        let mut t = self.tables.lock().unwrap();
        if t.questions.iter().any(|q| q.title == title) {
            return Err(RepoError::Conflict("questions_title_key".into()));
        }
        if !t.themes.iter().any(|th| th.id == theme_id) {
            return Err(RepoError::MissingReference("questions_theme_id_fkey".into()));
        }
        let taken = t
            .questions
            .iter()
            .flat_map(|q| q.answers.iter())
            .any(|existing| answers.iter().any(|a| a.title == existing.title));
        let repeated = answers
            .iter()
            .enumerate()
            .any(|(i, a)| answers[..i].iter().any(|b| b.title == a.title));
        if taken || repeated {
            return Err(RepoError::Conflict("answers_title_key".into()));
        }
        let id = t.next_id();
        let question = Question {
            id,
            title: title.to_string(),
            theme_id,
            answers: answers.to_vec(),
        };
        t.questions.push(question.clone());
        Ok(question)
    }

    async fn get_question_by_title(&self, title: &str) -> RepoResult<Option<Question>> {
        self.hit();
        let t = self.tables.lock().unwrap();
        Ok(t.questions.iter().find(|q| q.title == title).cloned())
    }

    async fn list_questions(&self, theme_id: Option<i32>) -> RepoResult<Vec<Question>> {
        self.hit();
        let t = self.tables.lock().unwrap();
        Ok(t.questions
            .iter()
            .filter(|q| theme_id.is_none_or(|id| q.theme_id == id))
            .cloned()
            .collect())
    }
}

pub fn test_state(repo: Arc<InMemoryRepository>) -> AppState {
    AppState {
        repo,
        config: AppConfig::default(),
    }
}

/// Seeds a live session for the standard admin and returns its cookie header.
pub fn session_cookie_for(repo: &InMemoryRepository) -> String {
    let session = repo.open_session(&repo.admin().profile(), Utc::now() + Duration::hours(1));
    format!("session_id={}", session.id)
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
