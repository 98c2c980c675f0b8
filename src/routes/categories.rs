/**
 * Category Routes
 * Read-only category listing and per-category question lookup
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::models::{Category, Question};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::AppState;

/// Response for GET /categories
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub status_code: u16,
    pub success: bool,
    pub data: Vec<Category>,
}

/// Response for GET /categories/{id}/questions
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i32>,
}

/// GET /categories - List every category
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<CategoryListResponse>> {
    let categories = state.store.categories().await?;

    Ok(Json(CategoryListResponse {
        status_code: 200,
        success: true,
        data: categories,
    }))
}

/// GET /categories/{id}/questions - Questions filed under one category
#[tracing::instrument(skip(state))]
pub async fn questions_by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i32>,
) -> ApiResult<Json<CategoryQuestionsResponse>> {
    let category = state
        .store
        .category(category_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let questions = state.store.questions_in_category(category.id).await?;
    tracing::debug!(count = questions.len(), "questions in category");

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: Some(category.id),
    }))
}
