/**
 * Question Routes
 * Listing, creation, deletion and search of trivia questions
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::models::{Category, NewQuestion, Question};
use crate::error::{ApiError, ApiResult};
use crate::extract::{present, required, ApiJson, ApiPath, ApiQuery};
use crate::AppState;

pub const QUESTIONS_PER_PAGE: i64 = 10;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for GET /questions
#[derive(Debug, Default)]
pub struct QuestionListQuery {
    /// Kept raw so a non-integer value falls back to the first page.
    pub page: Option<String>,
}

impl QuestionListQuery {
    /// Build from raw query pairs; a repeated key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let page = pairs
            .into_iter()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value);
        Self { page }
    }

    /// Requested page. Integers outside `i64` saturate; anything else is page 1.
    pub fn page(&self) -> i64 {
        self.page.as_deref().and_then(parse_page).unwrap_or(1)
    }
}

fn parse_page(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match raw.parse::<i64>() {
        Ok(page) => Some(page),
        Err(_) if negative => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Response for GET /questions
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub status_code: u16,
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub current_category: Option<i32>,
    pub categories: Vec<Category>,
}

/// Request body for POST /questions
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(default, deserialize_with = "present")]
    pub question: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub answer: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub difficulty: Option<Option<i32>>,
}

impl CreateQuestionRequest {
    fn validate(self) -> ApiResult<NewQuestion> {
        Ok(NewQuestion {
            question: required("question", self.question)?,
            answer: required("answer", self.answer)?,
            category: required("category", self.category)?,
            difficulty: required("difficulty", self.difficulty)?,
        })
    }
}

/// Response for POST /questions
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuestionResponse {
    pub status_code: u16,
    pub question: Question,
    pub message: String,
    pub success: bool,
}

/// Response for DELETE /questions/{id}
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteQuestionResponse {
    pub status_code: u16,
    pub success: bool,
    pub deleted: i32,
    pub message: String,
}

/// Request body for POST /questions/searches
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default, deserialize_with = "present")]
    pub search_term: Option<Option<String>>,
}

/// Response for POST /questions/searches
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i32>,
}

// ============================================================================
// Pagination
// ============================================================================

/// Offset and limit of the window `[(page-1)*10, page*10)`.
///
/// Page 0 yields the first window; negative pages are rejected.
pub fn page_window(page: i64) -> ApiResult<(i64, i64)> {
    if page < 0 {
        return Err(ApiError::Unprocessable(format!("page {page} is negative")));
    }
    let offset = (page - 1).max(0).saturating_mul(QUESTIONS_PER_PAGE);
    Ok((offset, QUESTIONS_PER_PAGE))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /questions - Paginated questions plus every category
pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> ApiResult<Json<QuestionListResponse>> {
    let query = QuestionListQuery::from_pairs(params);
    let (offset, limit) = page_window(query.page())?;

    let questions = state.store.questions_page(offset, limit).await?;
    let total_questions = state.store.questions_count().await?;
    let categories = state.store.categories().await?;

    Ok(Json(QuestionListResponse {
        status_code: 200,
        success: true,
        questions,
        total_questions,
        current_category: None,
        categories,
    }))
}

/// DELETE /questions/{id} - Permanently remove a question
#[tracing::instrument(skip(state))]
pub async fn delete_question(
    State(state): State<AppState>,
    ApiPath(question_id): ApiPath<i32>,
) -> ApiResult<Json<DeleteQuestionResponse>> {
    if state.store.question(question_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    // A concurrent delete may win between lookup and removal
    if !state.store.delete_question(question_id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(question_id, "question deleted");

    Ok(Json(DeleteQuestionResponse {
        status_code: 200,
        success: true,
        deleted: question_id,
        message: "The question was successfully deleted.".to_string(),
    }))
}

/// POST /questions - Create a question; the store assigns its id
pub async fn create_question(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateQuestionRequest>,
) -> ApiResult<Json<CreateQuestionResponse>> {
    let new = body.validate()?;
    let question = state.store.insert_question(new).await?;

    tracing::info!(question_id = question.id, category = question.category, "question created");

    Ok(Json(CreateQuestionResponse {
        status_code: 200,
        question,
        message: "The question was successfully created".to_string(),
        success: true,
    }))
}

/// POST /questions/searches - Case-insensitive search on question text
pub async fn search_questions(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let term = required("searchTerm", body.search_term)?;
    let questions = state.store.search_questions(&term).await?;

    tracing::debug!(term = %term, hits = questions.len(), "question search");

    Ok(Json(SearchResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: None,
    }))
}
