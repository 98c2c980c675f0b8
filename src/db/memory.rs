//! In-process [`TriviaStore`] used when no database is configured, and by tests.
//!
//! Data lives only as long as the process. Ids are assigned from a counter
//! that never reuses a value, matching a `SERIAL` column.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{Category, NewQuestion, Question, StoreResult, TriviaStore};

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<Category>,
    questions: Vec<Question>,
    next_question_id: i32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with categories and questions.
    ///
    /// Question ids continue after the highest seeded id.
    pub fn seeded(mut categories: Vec<Category>, mut questions: Vec<Question>) -> Self {
        categories.sort_by_key(|c| c.id);
        questions.sort_by_key(|q| q.id);
        let next_question_id = questions.last().map_or(1, |q| q.id + 1);

        Self {
            tables: RwLock::new(Tables {
                categories,
                questions,
                next_question_id,
            }),
        }
    }
}

#[async_trait]
impl TriviaStore for MemoryStore {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn category(&self, id: i32) -> StoreResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn questions_page(&self, offset: i64, limit: i64) -> StoreResult<Vec<Question>> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(tables
            .questions
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn questions_count(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.questions.len() as i64)
    }

    async fn question(&self, id: i32) -> StoreResult<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let mut tables = self.tables.write().await;
        let id = tables.next_question_id.max(1);
        tables.next_question_id = id + 1;

        let question = new.into_question(id);
        tables.questions.push(question.clone());
        Ok(question)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        Ok(tables.questions.len() < before)
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        let needle = term.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn random_question(
        &self,
        category: Option<i32>,
        exclude: &[i32],
    ) -> StoreResult<Option<Question>> {
        let tables = self.tables.read().await;
        let candidates: Vec<&Question> = tables
            .questions
            .iter()
            .filter(|q| category.map_or(true, |c| q.category == c))
            .filter(|q| !exclude.contains(&q.id))
            .collect();

        Ok(candidates
            .choose(&mut rand::thread_rng())
            .map(|q| (*q).clone()))
    }

    async fn ping(&self) -> StoreResult<Duration> {
        let start = Instant::now();
        drop(self.tables.read().await);
        Ok(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn question(id: i32, text: &str, category: i32) -> Question {
        Question {
            id,
            question: text.to_string(),
            answer: "answer".to_string(),
            category,
            difficulty: 1,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::seeded(
            vec![
                Category { id: 1, kind: "Science".to_string() },
                Category { id: 2, kind: "Art".to_string() },
            ],
            vec![
                question(1, "What is penicillin?", 1),
                question(2, "Who painted the Mona Lisa?", 2),
                question(3, "What is H2O?", 1),
                question(4, "Who sculpted David?", 2),
            ],
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = store();
        let new = NewQuestion {
            question: "Q".to_string(),
            answer: "A".to_string(),
            category: 1,
            difficulty: 2,
        };
        let first = store.insert_question(new.clone()).await.unwrap();
        let second = store.insert_question(new).await.unwrap();
        assert_eq!(first.id, 5);
        assert_eq!(second.id, 6);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let store = store();
        assert!(store.delete_question(4).await.unwrap());
        let inserted = store
            .insert_question(NewQuestion {
                question: "Q".to_string(),
                answer: "A".to_string(),
                category: 1,
                difficulty: 2,
            })
            .await
            .unwrap();
        assert_eq!(inserted.id, 5);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = store();
        assert!(!store.delete_question(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_on_question_only() {
        let store = store();
        let hits = store.search_questions("PENICILLIN").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // "answer" only appears in the answer column
        assert!(store.search_questions("answer").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_random_question_respects_category_and_exclusions() {
        let store = store();
        for _ in 0..50 {
            let picked = store.random_question(Some(1), &[1]).await.unwrap().unwrap();
            assert_eq!(picked.id, 3);
        }
        assert!(store.random_question(Some(1), &[1, 3]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_random_question_without_category_reaches_every_candidate() {
        let store = store();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let picked = store.random_question(None, &[2]).await.unwrap().unwrap();
            seen.insert(picked.id);
        }
        assert_eq!(seen, HashSet::from([1, 3, 4]));
    }

    #[tokio::test]
    async fn test_questions_page_windows_in_id_order() {
        let store = store();
        let page = store.questions_page(1, 2).await.unwrap();
        let ids: Vec<i32> = page.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(store.questions_page(10, 10).await.unwrap().is_empty());
    }
}
