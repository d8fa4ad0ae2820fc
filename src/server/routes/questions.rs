use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_string_from_number,
};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        Category, Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_page, first_page},
        error::{ApiError, ApiResponse},
    },
};

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_string_from_number")]
    category: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: Vec<Category>,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: &'static str,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    total_questions: usize,
    questions: Vec<Question>,
    #[serde(rename = "currentCategory")]
    current_category: Vec<String>,
}

/// 1-based; pages below 1 are empty.
fn paginate(questions: &[Question], page: i64) -> Vec<Question> {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| usize::try_from(p).ok())
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return Vec::new();
    };
    questions
        .iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Query(PageQuery { page }) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let all_questions = questions::get_all_questions(&pool).await?;
    let categories = get_all_categories(&pool).await?;

    let page_questions = paginate(&all_questions, page);
    if page_questions.is_empty() {
        tracing::debug!(page, total = all_questions.len(), "Requested page is empty");
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: page_questions,
        total_questions: all_questions.len(),
        categories,
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = path.map_err(|_| ApiError::NotFound)?;
    questions::delete_question(&pool, id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                ApiError::Unprocessable(format!("question {id} does not exist"))
            }
            other => ApiError::Database(other),
        })?;

    tracing::info!(id, "Question deleted");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<NewQuestion>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(new_question) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if new_question.question.trim().is_empty() || new_question.answer.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "question and answer must not be blank".to_owned(),
        ));
    }

    let id = questions::create_question(
        &pool,
        &new_question.question,
        &new_question.answer,
        &new_question.category,
        new_question.difficulty,
    )
    .await?;

    tracing::info!(id, category = %new_question.category, "Question created");
    Ok(Json(Created {
        success: true,
        created: "question",
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(SearchBody { search_term }) =
        body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let found = questions::search_questions(&pool, &search_term).await?;
    Ok(Json(SearchResults {
        success: true,
        total_questions: found.len(),
        current_category: found.iter().map(|q| q.category.clone()).collect(),
        questions: found,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search_questions))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: i64) -> Vec<Question> {
        (1..=count)
            .map(|id| Question {
                id,
                question: format!("question {id}"),
                answer: format!("answer {id}"),
                category: "1".to_owned(),
                difficulty: 1,
            })
            .collect()
    }

    fn page_ids(questions: &[Question], page: i64) -> Vec<i64> {
        paginate(questions, page).iter().map(|q| q.id).collect()
    }

    #[test]
    fn pages_hold_ten_questions() {
        let questions = numbered(23);
        assert_eq!(page_ids(&questions, 1), (1..=10).collect::<Vec<_>>());
        assert_eq!(page_ids(&questions, 3), vec![21, 22, 23]);
        assert!(page_ids(&questions, 4).is_empty());
    }

    #[test]
    fn pages_below_one_are_empty() {
        let questions = numbered(23);
        assert!(page_ids(&questions, 0).is_empty());
        assert!(page_ids(&questions, -1).is_empty());
        assert!(page_ids(&questions, i64::MIN).is_empty());
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        assert!(page_ids(&numbered(3), i64::MAX).is_empty());
    }

    #[test]
    fn new_question_accepts_numeric_strings() {
        let body: NewQuestion = serde_json::from_str(
            r#"{"question": "q", "answer": "a", "category": 2, "difficulty": "4"}"#,
        )
        .unwrap();
        assert_eq!(body.category, "2");
        assert_eq!(body.difficulty, 4);
    }
}
