//! Theme and question operations on top of the repository.
//!
//! The uniqueness pre-checks give a clean 409 in the common case; the store's
//! unique constraints still catch concurrent duplicates, which come back as
//! `RepoError::Conflict` and map to the same status.

use crate::{
    error::{AppError, AppResult},
    models::{CreateQuestionRequest, Question, Theme},
    repository::Repository,
    validation::answers_are_valid,
};

/// Creates a theme; 409 when the title is taken.
pub async fn create_theme(repo: &dyn Repository, title: &str) -> AppResult<Theme> {
    if repo.get_theme_by_title(title).await?.is_some() {
        return Err(AppError::Conflict(format!("theme {title:?} already exists")));
    }

    let theme = repo.create_theme(title).await?;
    tracing::info!(theme_id = theme.id, %title, "theme created");
    Ok(theme)
}

pub async fn list_themes(repo: &dyn Repository) -> AppResult<Vec<Theme>> {
    Ok(repo.list_themes().await?)
}

/// create_question
///
/// Checks run in a fixed order: answers (400), theme existence (404), title
/// uniqueness (409). Nothing is written unless all three pass.
pub async fn create_question(
    repo: &dyn Repository,
    req: &CreateQuestionRequest,
) -> AppResult<Question> {
    if !answers_are_valid(&req.answers) {
        return Err(AppError::BadRequest(
            "a question needs at least two answers and exactly one correct answer".to_string(),
        ));
    }

    if repo.get_theme_by_id(req.theme_id).await?.is_none() {
        return Err(AppError::NotFound(format!("theme {} does not exist", req.theme_id)));
    }

    if repo.get_question_by_title(&req.title).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "question {:?} already exists",
            req.title
        )));
    }

    let question = repo
        .create_question(&req.title, req.theme_id, &req.answers)
        .await?;
    tracing::info!(
        question_id = question.id,
        theme_id = question.theme_id,
        answers = question.answers.len(),
        "question created"
    );
    Ok(question)
}

/// All questions, or only those of `theme_id`, each with its answers.
pub async fn list_questions(repo: &dyn Repository, theme_id: Option<i32>) -> AppResult<Vec<Question>> {
    Ok(repo.list_questions(theme_id).await?)
}
