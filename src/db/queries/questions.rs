use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Category id, kept as text.
    pub category: String,
    pub difficulty: i64,
}

const SELECT_QUESTIONS: &str = "SELECT id, question, answer, category, difficulty FROM questions";

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: &str,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "{SELECT_QUESTIONS} WHERE questions.category = ?1 ORDER BY id"
    ))
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Literal substring match on the question text, case folded on both sides
/// (Unicode lowercase, so "école" finds "l'ÉCOLE").
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    Ok(get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

/// Questions not listed in `exclude`, limited to `category` when given.
// exclusion happens here rather than in SQL: `exclude` is client-sized and
// would overrun SQLite's bind-variable limit as a NOT IN list
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category: Option<&str>,
    exclude: &HashSet<i64>,
) -> sqlx::Result<Vec<Question>> {
    let questions = match category {
        Some(category) => get_questions_for_category(pool, category).await?,
        None => get_all_questions(pool).await?,
    };
    Ok(questions
        .into_iter()
        .filter(|q| !exclude.contains(&q.id))
        .collect())
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: &str,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Fails with `RowNotFound` when there is no question `id`.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT id FROM questions WHERE questions.id = ?1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM questions WHERE questions.id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// Makes the table hold exactly `questions`, keeping their ids.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_questions(pool)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();

    let mut tx = pool.begin().await?;
    for id in existing_ids.difference(&new_ids) {
        sqlx::query("DELETE FROM questions WHERE questions.id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
