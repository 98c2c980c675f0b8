/**
 * Quiz Routes
 * Serves the next random question of a quiz round
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::models::Question;
use crate::error::ApiResult;
use crate::extract::{present, required, ApiJson};
use crate::AppState;

/// Category id meaning "draw from every category".
pub const ANY_CATEGORY: i32 = 0;

/// The `quiz_category` object sent by the client; extra keys such as `type`
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Option<i32>>,
}

/// Request body for POST /quizzes
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default, deserialize_with = "present")]
    pub previous_questions: Option<Option<Vec<i32>>>,
    #[serde(default, deserialize_with = "present")]
    pub quiz_category: Option<Option<QuizCategory>>,
}

/// Response for POST /quizzes
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

/// Translate the client category id into a store filter.
pub fn category_filter(id: i32) -> Option<i32> {
    (id != ANY_CATEGORY).then_some(id)
}

/// POST /quizzes - Random question not yet asked in this round
pub async fn next_quiz_question(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<QuizRequest>,
) -> ApiResult<Json<QuizResponse>> {
    let previous = required("previous_questions", body.previous_questions)?;
    let category = required("quiz_category", body.quiz_category)?;
    let category_id = required("quiz_category.id", category.id)?;

    let question = state
        .store
        .random_question(category_filter(category_id), &previous)
        .await?;

    let response = match question {
        Some(question) => QuizResponse {
            success: true,
            status_code: 200,
            message: "success".to_string(),
            question: Some(question),
        },
        None => {
            tracing::debug!(category_id, asked = previous.len(), "quiz round exhausted");
            QuizResponse {
                success: true,
                status_code: 200,
                message: "No more questions.".to_string(),
                question: None,
            }
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_any_category() {
        assert_eq!(category_filter(0), None);
        assert_eq!(category_filter(2), Some(2));
    }

    #[test]
    fn test_quiz_category_ignores_extra_keys() {
        let body: QuizRequest = serde_json::from_str(
            r#"{"previous_questions":[1,2],"quiz_category":{"id":3,"type":"History"}}"#,
        )
        .unwrap();
        let category = body.quiz_category.flatten().unwrap();
        assert_eq!(category.id, Some(Some(3)));
        assert_eq!(body.previous_questions, Some(Some(vec![1, 2])));
    }

    #[test]
    fn test_exhausted_response_omits_question() {
        let response = QuizResponse {
            success: true,
            status_code: 200,
            message: "No more questions.".to_string(),
            question: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("question").is_none());
    }
}
