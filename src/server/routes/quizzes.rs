use std::collections::HashSet;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_quiz_candidates},
        Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_nullable_category_id, QuestionId},
        error::{ApiError, ApiResponse},
    },
    telemetry::record_quiz_question,
};

/// Category type the client sends when the quiz spans every category.
pub const ALL_CATEGORIES: &str = "click";

/// Metric labels for quizzes that are not tied to one stored category.
const LABEL_ALL: &str = "all";
const LABEL_UNKNOWN: &str = "unknown";

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_nullable_category_id")]
    id: Option<Option<String>>,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    previous_questions: Vec<QuestionId>,
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    question: Option<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizScope<'a> {
    All,
    Category(&'a str),
    /// `"id": null`; stored questions always carry a category, so nothing matches.
    Uncategorized,
}

impl QuizCategory {
    fn scope(&self) -> Result<QuizScope<'_>, ApiError> {
        if self.kind == ALL_CATEGORIES {
            return Ok(QuizScope::All);
        }
        match &self.id {
            None => Err(ApiError::Unprocessable(format!(
                "quiz category {:?} has no id",
                self.kind
            ))),
            Some(None) => Ok(QuizScope::Uncategorized),
            Some(Some(id)) => Ok(QuizScope::Category(id.as_str())),
        }
    }
}

fn pick_question(candidates: &[Question]) -> Option<Question> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

/// Counter label for `scope`. Only stored category ids become labels, so
/// clients cannot grow the label set.
async fn metric_label(pool: &SqlitePool, scope: &QuizScope<'_>) -> sqlx::Result<String> {
    let id = match scope {
        QuizScope::All => return Ok(LABEL_ALL.to_owned()),
        QuizScope::Uncategorized => return Ok(LABEL_UNKNOWN.to_owned()),
        QuizScope::Category(id) => *id,
    };
    let known = get_all_categories(pool)
        .await?
        .iter()
        .any(|c| c.id.to_string() == id);
    Ok(if known { id } else { LABEL_UNKNOWN }.to_owned())
}

async fn next_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<NextQuestion>> {
    let Json(request) = body.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let scope = request.quiz_category.scope()?;
    let previous: HashSet<i64> = request.previous_questions.iter().map(|id| id.0).collect();

    let candidates = match scope {
        QuizScope::All => get_quiz_candidates(&pool, None, &previous).await?,
        QuizScope::Category(id) => get_quiz_candidates(&pool, Some(id), &previous).await?,
        QuizScope::Uncategorized => Vec::new(),
    };
    let question = pick_question(&candidates);

    match &question {
        Some(q) => {
            let label = metric_label(&pool, &scope).await?;
            record_quiz_question(&label);
            tracing::debug!(
                category = %label,
                id = q.id,
                remaining = candidates.len() - 1,
                "Quiz question picked"
            );
        }
        None => tracing::debug!(scope = ?scope, "Quiz has no questions left"),
    }

    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
