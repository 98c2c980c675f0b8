#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use trivia_backend::db::{Category, MemoryStore, Question};
use trivia_backend::{create_app, AppState};

pub fn categories() -> Vec<Category> {
    ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        .into_iter()
        .enumerate()
        .map(|(i, kind)| Category {
            id: i as i32 + 1,
            kind: kind.to_string(),
        })
        .collect()
}

fn q(id: i32, question: &str, answer: &str, category: i32, difficulty: i32) -> Question {
    Question {
        id,
        question: question.to_string(),
        answer: answer.to_string(),
        category,
        difficulty,
    }
}

/// Nineteen questions across six categories; exactly one mentions penicillin.
pub fn questions() -> Vec<Question> {
    vec![
        q(2, "What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
        q(4, "What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", 5, 4),
        q(5, "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
        q(6, "What was the title of the 1990 fantasy directed by Tim Burton about a young man with multi-bladed appendages?", "Edward Scissorhands", 5, 3),
        q(9, "What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
        q(10, "Which is the only team to play in every soccer World Cup tournament?", "Brazil", 6, 3),
        q(11, "Which country won the first ever soccer World Cup in 1930?", "Uruguay", 6, 4),
        q(12, "Who invented Peanut Butter?", "George Washington Carver", 4, 2),
        q(13, "What is the largest lake in Africa?", "Lake Victoria", 3, 2),
        q(14, "In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
        q(15, "The Taj Mahal is located in which Indian city?", "Agra", 3, 2),
        q(16, "Which Dutch graphic artist-initials M C was a creator of optical illusions?", "Escher", 2, 1),
        q(17, "La Giaconda is better known as what?", "Mona Lisa", 2, 3),
        q(18, "How many paintings did Van Gogh sell in his lifetime?", "One", 2, 4),
        q(19, "Which American artist was a pioneer of Abstract Expressionism, and a leading exponent of action painting?", "Jackson Pollock", 2, 2),
        q(20, "What is the heaviest organ in the human body?", "The Liver", 1, 4),
        q(21, "Who discovered penicillin?", "Alexander Fleming", 1, 3),
        q(22, "Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
        q(23, "Which dung beetle was worshipped by the ancient Egyptians?", "Scarab", 4, 4),
    ]
}

pub fn seeded_store() -> MemoryStore {
    MemoryStore::seeded(categories(), questions())
}

pub fn app() -> Router {
    create_app(AppState::new(seeded_store()))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let res = app
        .clone()
        .oneshot(req.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond");

    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}
