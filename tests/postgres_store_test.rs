//! Exercises `PgStore` against a real database.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable Postgres database;
//! the tables there are truncated.

use trivia_backend::db::{self, DbConfig, NewQuestion, PgStore, TriviaStore};

async fn store() -> Option<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = db::init_pool(Some(DbConfig {
        url,
        max_connections: 2,
        min_connections: 1,
        connect_timeout_secs: 5,
        idle_timeout_secs: 30,
    }))
    .await
    .expect("test database should be reachable");
    db::run_migrations(&pool).await.expect("migrations should apply");

    sqlx::query("TRUNCATE questions, categories RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate");
    sqlx::query("INSERT INTO categories (type) VALUES ('Science'), ('Art')")
        .execute(&pool)
        .await
        .expect("seed categories");

    Some(PgStore::new(pool))
}

fn new_question(text: &str, category: i32) -> NewQuestion {
    NewQuestion {
        question: text.to_string(),
        answer: "answer".to_string(),
        category,
        difficulty: 2,
    }
}

// One test so the truncate/seed steps never race each other.
#[tokio::test]
async fn test_pg_store_round_trip() {
    let Some(store) = store().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let categories = store.categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].kind, "Science");
    assert!(store.category(1000).await.unwrap().is_none());

    let first = store
        .insert_question(new_question("Who discovered penicillin?", 1))
        .await
        .unwrap();
    let second = store
        .insert_question(new_question("What does 100% mean?", 2))
        .await
        .unwrap();
    assert!(second.id > first.id);
    assert_eq!(store.questions_count().await.unwrap(), 2);

    let hits = store.search_questions("PENICILLIN").await.unwrap();
    assert_eq!(hits, vec![first.clone()]);
    // "%" is matched literally, not as a wildcard
    assert_eq!(store.search_questions("0%").await.unwrap(), vec![second.clone()]);
    assert!(store.search_questions("x%y").await.unwrap().is_empty());

    let page = store.questions_page(0, 10).await.unwrap();
    assert_eq!(page, vec![first.clone(), second.clone()]);
    assert!(store.questions_page(10, 10).await.unwrap().is_empty());

    assert_eq!(
        store.questions_in_category(2).await.unwrap(),
        vec![second.clone()]
    );

    let picked = store.random_question(Some(1), &[]).await.unwrap();
    assert_eq!(picked, Some(first.clone()));
    assert!(store.random_question(Some(1), &[first.id]).await.unwrap().is_none());
    let any = store.random_question(None, &[first.id]).await.unwrap();
    assert_eq!(any, Some(second.clone()));

    assert!(store.delete_question(first.id).await.unwrap());
    assert!(!store.delete_question(first.id).await.unwrap());
    assert!(store.question(first.id).await.unwrap().is_none());

    store.ping().await.unwrap();
}
