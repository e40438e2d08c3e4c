//! End-to-end tests over the HTTP layer
//!
//! Each test boots the full router against a fresh in-memory database and
//! drives it through real requests. Outbound mail is captured by a
//! recording double instead of hitting SMTP.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use newsdesk::db::repositories::{
    NewsRepository, SqlxCaptchaRepository, SqlxCategoryRepository, SqlxNewsRepository,
    SqlxSessionRepository, SqlxUserRepository, UserRepository,
};
use newsdesk::db::{create_test_pool, migrations};
use newsdesk::models::CreateNewsInput;
use newsdesk::services::{CaptchaService, Mailer, NewsService, UserService};
use newsdesk::web::templates::Templates;
use newsdesk::web::{build_router, AppState};

/// Mailer double that records deliveries and can be told to fail.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock").len()
    }

    fn last_body(&self) -> Option<String> {
        self.sent
            .lock()
            .expect("mailer lock")
            .last()
            .map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("transport down"));
        }
        self.sent
            .lock()
            .expect("mailer lock")
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

struct TestApp {
    server: TestServer,
    state: AppState,
    news_repo: Arc<dyn NewsRepository>,
    user_repo: Arc<dyn UserRepository>,
    outbox: Arc<RecordingMailer>,
}

async fn spawn_app() -> TestApp {
    let pool = create_test_pool().await.expect("test pool");
    migrations::run_migrations(&pool).await.expect("migrations");

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let news_repo = SqlxNewsRepository::boxed(pool.clone());
    let captcha_repo = SqlxCaptchaRepository::boxed(pool.clone());

    let outbox = Arc::new(RecordingMailer::default());

    let state = AppState {
        user_service: Arc::new(UserService::new(user_repo.clone(), session_repo)),
        news_service: Arc::new(NewsService::new(news_repo.clone(), category_repo)),
        captcha: Arc::new(CaptchaService::new(captcha_repo)),
        mailer: outbox.clone(),
        templates: Arc::new(Templates::new().expect("templates")),
    };

    let mut server = TestServer::new(build_router(state.clone())).expect("test server");
    server.save_cookies();

    TestApp {
        server,
        state,
        news_repo,
        user_repo,
        outbox,
    }
}

impl TestApp {
    /// Register and log in a user through the real endpoint, so the server
    /// holds a session cookie afterwards.
    async fn register(&self, username: &str) {
        let response = self
            .server
            .post("/register")
            .form(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "correct horse",
                "password_confirm": "correct horse",
            }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    /// Insert an article directly, optionally published.
    async fn seed_article(&self, title: &str, category_id: i64, published: bool) -> i64 {
        let author = self
            .user_repo
            .get_by_username("seeder")
            .await
            .expect("lookup");
        let author_id = match author {
            Some(user) => user.id,
            None => {
                self.user_repo
                    .create(&newsdesk::models::User::new(
                        "seeder".to_string(),
                        "seeder@example.com".to_string(),
                        "hash".to_string(),
                    ))
                    .await
                    .expect("seed user")
                    .id
            }
        };

        let article = self
            .news_repo
            .create(&CreateNewsInput {
                title: title.to_string(),
                content: "body".to_string(),
                category_id,
                author_id,
            })
            .await
            .expect("seed article");
        if published {
            self.news_repo
                .set_published(article.id, true)
                .await
                .expect("publish");
        }
        article.id
    }

    /// Issue a challenge and solve it.
    async fn solved_captcha(&self) -> (String, String) {
        let challenge = self.state.captcha.issue().await.expect("challenge");
        let mut parts = challenge.question.split(" + ");
        let a: u32 = parts.next().expect("operand").parse().expect("number");
        let b: u32 = parts.next().expect("operand").parse().expect("number");
        (challenge.token, (a + b).to_string())
    }
}

#[tokio::test]
async fn test_register_creates_user_and_logs_in() {
    let app = spawn_app().await;

    app.register("alice").await;

    let user = app
        .user_repo
        .get_by_username("alice")
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(user.email, "alice@example.com");

    // The saved session cookie makes the submission form reachable
    let response = app.server.get("/news/add").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_username_rerenders() {
    let app = spawn_app().await;
    app.register("alice").await;

    let response = app
        .server
        .post("/register")
        .form(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "correct horse",
            "password_confirm": "correct horse",
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("already taken"));
    assert!(body.contains("Registration failed"));
    assert_eq!(app.user_repo.count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_login_failure_rerenders_without_detail() {
    let app = spawn_app().await;
    app.register("alice").await;

    let response = app
        .server
        .post("/login")
        .form(&json!({"username": "alice", "password": "wrong"}))
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Invalid username or password"));
    assert!(!body.contains("wrong"));
}

#[tokio::test]
async fn test_home_lists_published_only_newest_first() {
    let app = spawn_app().await;
    app.seed_article("Hidden draft", 1, false).await;
    app.seed_article("Older story", 1, true).await;
    app.seed_article("Newer story", 1, true).await;

    let response = app.server.get("/").await;
    response.assert_status(StatusCode::OK);

    let body = response.text();
    assert!(body.contains("Older story"));
    assert!(body.contains("Newer story"));
    assert!(!body.contains("Hidden draft"));
    assert!(body.find("Newer story").expect("newer") < body.find("Older story").expect("older"));
    assert!(body.contains("NEWS"));
}

#[tokio::test]
async fn test_category_listing_filters() {
    let app = spawn_app().await;
    app.seed_article("Tax bill advances", 1, true).await;
    app.seed_article("Market rally", 2, true).await;
    app.seed_article("Rates decision", 2, true).await;

    let response = app.server.get("/category/2").await;
    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Market rally"));
    assert!(body.contains("Rates decision"));
    assert!(!body.contains("Tax bill advances"));

    let response = app.server.get("/category/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_home_pagination_page_size() {
    let app = spawn_app().await;
    for n in 0..5 {
        app.seed_article(&format!("Story number {}", n), 1, true)
            .await;
    }

    let body = app.server.get("/").await.text();
    assert!(body.contains("Story number 4"));
    assert!(!body.contains("Story number 0"));
    assert!(body.contains("page=2"));

    let body = app.server.get("/?page=2").await.text();
    assert!(body.contains("Story number 0"));
    assert!(!body.contains("Story number 4"));
}

#[tokio::test]
async fn test_home_survives_absurd_page_number() {
    let app = spawn_app().await;
    app.seed_article("Lone story", 1, true).await;

    let response = app.server.get("/?page=4000000000").await;
    response.assert_status(StatusCode::OK);
    assert!(!response.text().contains("Lone story"));
}

#[tokio::test]
async fn test_draft_detail_hidden_from_anonymous() {
    let app = spawn_app().await;
    let id = app.seed_article("Pending story", 1, false).await;

    let response = app.server.get(&format!("/news/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);

    app.register("alice").await;
    let response = app.server.get(&format!("/news/{}", id)).await;
    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("Pending story"));
}

#[tokio::test]
async fn test_add_news_requires_login() {
    let app = spawn_app().await;

    let response = app.server.get("/news/add").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").expect("location"),
        "/login"
    );

    let response = app
        .server
        .post("/news/add")
        .form(&json!({"title": "Drive-by story", "content": "body", "category_id": 1}))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(app.news_repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn test_add_news_rejects_leading_digit_title() {
    let app = spawn_app().await;
    app.register("alice").await;

    let response = app
        .server
        .post("/news/add")
        .form(&json!({"title": "3 things to know", "content": "body", "category_id": 1}))
        .await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("must not start with a digit"));
    assert_eq!(app.news_repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn test_add_news_creates_unpublished_draft() {
    let app = spawn_app().await;
    app.register("alice").await;

    let response = app
        .server
        .post("/news/add")
        .form(&json!({
            "title": "Council passes budget",
            "content": "After a long session the council...",
            "category_id": 1,
        }))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("location")
        .expect("location")
        .to_str()
        .expect("ascii");
    assert!(location.starts_with("/news/"));

    // Author sees their pending article, the public does not
    let detail = app.server.get(location).await;
    detail.assert_status(StatusCode::OK);
    assert!(detail.text().contains("Pending moderation"));

    let home = app.server.get("/").await.text();
    assert!(!home.contains("Council passes budget"));
}

#[tokio::test]
async fn test_logout_redirects_to_login_with_or_without_session() {
    let app = spawn_app().await;

    let response = app.server.post("/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").expect("location"),
        "/login"
    );

    app.register("alice").await;
    let response = app.server.post("/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);

    // The session is gone server-side
    let response = app.server.get("/news/add").await;
    response.assert_status(StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_contact_sends_mail_on_correct_answer() {
    let app = spawn_app().await;
    let (token, answer) = app.solved_captcha().await;

    let response = app
        .server
        .post("/contact")
        .form(&json!({
            "subject": "Tip",
            "content": "Check the council minutes",
            "mail": "reader@example.com",
            "captcha_token": token,
            "captcha_answer": answer,
        }))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(app.outbox.sent_count(), 1);
    let body = app.outbox.last_body().expect("body");
    assert!(body.ends_with("from: reader@example.com"));
}

#[tokio::test]
async fn test_contact_challenge_is_single_use() {
    let app = spawn_app().await;
    let (token, answer) = app.solved_captcha().await;

    let form = json!({
        "subject": "Tip",
        "content": "Check the council minutes",
        "mail": "reader@example.com",
        "captcha_token": token,
        "captcha_answer": answer,
    });

    let first = app.server.post("/contact").form(&form).await;
    first.assert_status(StatusCode::SEE_OTHER);

    // Same token again: consumed, so the submission fails
    let second = app.server.post("/contact").form(&form).await;
    second.assert_status(StatusCode::OK);
    assert!(second.text().contains("Wrong answer"));
    assert_eq!(app.outbox.sent_count(), 1);
}

#[tokio::test]
async fn test_contact_wrong_answer_consumes_challenge() {
    let app = spawn_app().await;
    let (token, answer) = app.solved_captcha().await;
    let wrong = format!("{}1", answer);

    let form = json!({
        "subject": "Tip",
        "content": "Check the council minutes",
        "mail": "reader@example.com",
        "captcha_token": token,
        "captcha_answer": wrong,
    });

    let response = app.server.post("/contact").form(&form).await;
    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Wrong answer"));
    assert!(body.contains("Validation failed"));

    // Even the right answer fails now: the token was spent on the first try
    let retry = app
        .server
        .post("/contact")
        .form(&json!({
            "subject": "Tip",
            "content": "Check the council minutes",
            "mail": "reader@example.com",
            "captcha_token": token,
            "captcha_answer": answer,
        }))
        .await;
    retry.assert_status(StatusCode::OK);
    assert_eq!(app.outbox.sent_count(), 0);
}

#[tokio::test]
async fn test_contact_delivery_failure_reports_error() {
    let app = spawn_app().await;
    app.outbox.fail.store(true, Ordering::SeqCst);
    let (token, answer) = app.solved_captcha().await;

    let response = app
        .server
        .post("/contact")
        .form(&json!({
            "subject": "Tip",
            "content": "Check the council minutes",
            "mail": "reader@example.com",
            "captcha_token": token,
            "captcha_answer": answer,
        }))
        .await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("Could not send your message"));
}

#[tokio::test]
async fn test_contact_page_shows_fresh_challenge() {
    let app = spawn_app().await;

    let body = app.server.get("/contact").await.text();
    assert!(body.contains("captcha_token"));
    assert!(body.contains("How much is"));
}

#[tokio::test]
async fn test_unknown_route_renders_404_page() {
    let app = spawn_app().await;
    let response = app.server.get("/no-such-page").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Page not found"));
}
