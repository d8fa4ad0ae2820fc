use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category, Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
    },
};

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesList {
        success: true,
        categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let Path(category_id) = path.map_err(|_| ApiError::NotFound)?;
    // compared against `id + 1`, not `id`
    let stored_category = category_id
        .checked_add(1)
        .ok_or(ApiError::NotFound)?
        .to_string();

    let questions = get_questions_for_category(&pool, &stored_category).await?;
    tracing::debug!(
        category_id,
        %stored_category,
        found = questions.len(),
        "Questions by category"
    );
    Ok(Json(CategoryQuestions {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: category_id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
