//! Database-backed tests for the ownership-filtered queries and the auth
//! handlers. They need a live Postgres, so they are ignored by default:
//!
//!   DATABASE_URL=postgres://... cargo test -- --ignored

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use prepwise::{
    ai::client::{AiClient, GeminiClient},
    auth::dto::RegisterRequest,
    auth::handlers::register,
    auth::repo::User,
    config::{AppConfig, GeminiConfig, JwtConfig},
    error::ApiError,
    questions::repo::Question,
    sessions::repo::Session,
    state::AppState,
    storage::{LocalStorage, StorageClient},
};

async fn setup_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

async fn create_user(db: &PgPool, name: &str) -> User {
    User::create(db, name, &unique_email(), "not-a-real-hash", None)
        .await
        .expect("create user")
}

async fn test_state(db: PgPool) -> AppState {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    let upload_dir = std::env::temp_dir().join(format!("prepwise-db-tests-{}", Uuid::new_v4()));
    let config = Arc::new(AppConfig {
        database_url: url,
        jwt: JwtConfig {
            secret: "db-test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
        gemini: GeminiConfig {
            api_key: "unused".into(),
            model: "gemini-2.0-flash".into(),
        },
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        max_body_bytes: 1024 * 1024,
    });
    let storage =
        Arc::new(LocalStorage::new(&upload_dir).await.expect("storage")) as Arc<dyn StorageClient>;
    let ai = Arc::new(GeminiClient::new(config.gemini.clone())) as Arc<dyn AiClient>;
    AppState::from_parts(db, config, storage, ai)
}

#[tokio::test]
#[ignore]
async fn foreign_user_cannot_see_session_or_questions() {
    let db = setup_pool().await;
    let owner = create_user(&db, "Owner").await;
    let stranger = create_user(&db, "Stranger").await;

    let session = Session::create(
        &db,
        owner.id,
        "Backend Engineer",
        "3",
        "Rust, SQL",
        Some("practice run"),
    )
    .await
    .expect("create session");

    let pairs = vec![
        ("What is ownership?".to_string(), "A model.".to_string()),
        ("What is a trait?".to_string(), "An interface.".to_string()),
    ];
    let inserted = Question::insert_many(&db, session.id, &pairs)
        .await
        .expect("insert questions");
    assert_eq!(inserted.len(), 2);

    // The owner sees the session, the other account does not.
    assert!(Session::find_owned(&db, owner.id, session.id)
        .await
        .expect("owner lookup")
        .is_some());
    assert!(Session::find_owned(&db, stranger.id, session.id)
        .await
        .expect("stranger lookup")
        .is_none());

    // Same for questions, which resolve ownership through the session.
    assert!(Question::find_owned(&db, owner.id, inserted[0].id)
        .await
        .expect("owner question lookup")
        .is_some());
    assert!(Question::find_owned(&db, stranger.id, inserted[0].id)
        .await
        .expect("stranger question lookup")
        .is_none());
}

#[tokio::test]
#[ignore]
async fn foreign_delete_mutates_nothing() {
    let db = setup_pool().await;
    let owner = create_user(&db, "Owner").await;
    let stranger = create_user(&db, "Stranger").await;

    let session = Session::create(&db, owner.id, "Data Engineer", "5", "SQL", None)
        .await
        .expect("create session");
    let pairs = vec![("Q1?".to_string(), "A1.".to_string())];
    Question::insert_many(&db, session.id, &pairs)
        .await
        .expect("insert questions");

    // Delete as the wrong user: reported as not found, nothing removed.
    let deleted = Session::delete_owned(&db, stranger.id, session.id)
        .await
        .expect("foreign delete");
    assert!(!deleted);
    assert!(Session::find_owned(&db, owner.id, session.id)
        .await
        .expect("owner lookup")
        .is_some());
    assert_eq!(
        Question::list_by_session(&db, session.id)
            .await
            .expect("list questions")
            .len(),
        1
    );

    // Delete as the owner removes the session and its questions.
    let deleted = Session::delete_owned(&db, owner.id, session.id)
        .await
        .expect("owner delete");
    assert!(deleted);
    assert!(Session::find_owned(&db, owner.id, session.id)
        .await
        .expect("owner lookup after delete")
        .is_none());
    assert!(Question::list_by_session(&db, session.id)
        .await
        .expect("list questions after delete")
        .is_empty());
}

#[tokio::test]
#[ignore]
async fn repeated_session_reads_return_identical_payloads() {
    let db = setup_pool().await;
    let owner = create_user(&db, "Owner").await;

    let session = Session::create(&db, owner.id, "SRE", "7", "Linux, K8s", None)
        .await
        .expect("create session");
    let pairs = vec![
        ("Q1?".to_string(), "A1.".to_string()),
        ("Q2?".to_string(), "A2.".to_string()),
    ];
    Question::insert_many(&db, session.id, &pairs)
        .await
        .expect("insert questions");

    let first_session = Session::find_owned(&db, owner.id, session.id)
        .await
        .expect("first read")
        .expect("session present");
    let first_questions = Question::list_by_session(&db, session.id)
        .await
        .expect("first question read");

    let second_session = Session::find_owned(&db, owner.id, session.id)
        .await
        .expect("second read")
        .expect("session present");
    let second_questions = Question::list_by_session(&db, session.id)
        .await
        .expect("second question read");

    assert_eq!(
        serde_json::to_value(&first_session).unwrap(),
        serde_json::to_value(&second_session).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&first_questions).unwrap(),
        serde_json::to_value(&second_questions).unwrap()
    );
}

#[tokio::test]
#[ignore]
async fn duplicate_email_registration_is_rejected() {
    let db = setup_pool().await;
    let state = test_state(db).await;
    let email = unique_email();

    let first = register(
        State(state.clone()),
        Json(RegisterRequest {
            name: "First".into(),
            email: email.clone(),
            password: "long-enough-password".into(),
            profile_image_url: None,
        }),
    )
    .await;
    assert!(first.is_ok(), "initial registration should succeed");

    let second = register(
        State(state),
        Json(RegisterRequest {
            name: "Second".into(),
            email,
            password: "another-long-password".into(),
            profile_image_url: None,
        }),
    )
    .await;
    let err = second.expect_err("duplicate email must be rejected");
    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
}
