use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use httpmock::prelude::*;
use sommelier::core::{TextGenerator, WineSource};
use sommelier::{router, AppState, CatalogAggregator, Result, Sommelier, SommelierError, TomlConfig, WineRecord};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct FakeGenerator {
    prompts: Mutex<Vec<String>>,
    reply: std::result::Result<String, String>,
}

impl FakeGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(SommelierError::generation)
    }
}

struct FakeSource;

#[async_trait]
impl WineSource for FakeSource {
    async fn fetch_category(&self, category: &str, _limit: usize) -> Result<Vec<WineRecord>> {
        Ok(match category {
            "reds" => vec![
                WineRecord::new("Malbec Reserve"),
                WineRecord::new("Chianti Classico"),
            ],
            "whites" => vec![WineRecord::new("Sancerre")],
            _ => vec![WineRecord::new("Crémant d'Alsace")],
        })
    }
}

fn app_with(generator: Arc<FakeGenerator>) -> axum::Router {
    let catalog = CatalogAggregator::new(Arc::new(FakeSource));
    router(AppState::new(catalog, Sommelier::new(generator)))
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const COOKIE: &str = "sommelier_session=test-session-1";

#[tokio::test]
async fn test_first_visit_issues_session_cookie() {
    let app = app_with(FakeGenerator::replying("unused"));

    let response = app.oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("sommelier_session="));

    let html = body_text(response).await;
    assert!(html.contains("AI Sommelier Wine Shop"));
    assert!(html.contains("Find the Perfect Wine for Your Meal"));
    assert!(html.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_page_views_do_not_create_sessions() {
    let catalog = CatalogAggregator::new(Arc::new(FakeSource));
    let state = AppState::new(catalog, Sommelier::new(FakeGenerator::replying("unused")));
    let app = router(state.clone());

    for _ in 0..50 {
        let response = app.clone().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    app.clone()
        .oneshot(get("/?tab=browse", Some("sommelier_session=made-up-id")))
        .await
        .unwrap();
    assert_eq!(state.sessions.len(), 0);

    app.oneshot(form_post("/cart/add", "item=Rioja", Some(COOKIE)))
        .await
        .unwrap();
    assert_eq!(state.sessions.len(), 1);
}

#[tokio::test]
async fn test_known_session_gets_no_new_cookie() {
    let app = app_with(FakeGenerator::replying("unused"));

    let response = app.oneshot(get("/?tab=ask", Some(COOKIE))).await.unwrap();

    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Ask Our AI Sommelier Anything"));
    assert!(html.contains("How do I store wine properly?"));
}

#[tokio::test]
async fn test_recommend_sends_preferences_and_renders_reply() {
    let generator = FakeGenerator::replying("1. Sancerre & friends");
    let app = app_with(generator.clone());

    let body = "wine_type=White&price_range=Premium+%28%24%24%24%29&taste=Crisp&taste=Dry\
                &meal_type=Seafood&meal_description=Grilled+salmon&occasion=Celebration&guests=4";
    let response = app
        .oneshot(form_post("/recommend", body, Some(COOKIE)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Sommelier&#39;s Recommendations"));
    assert!(html.contains("1. Sancerre &amp; friends"));

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Meal Type: Seafood"));
    assert!(prompts[0].contains("Dish Description: Grilled salmon"));
    assert!(prompts[0].contains("Price Range: Premium ($$$)"));
    assert!(prompts[0].contains("Taste Preferences: Dry, Crisp"));
    assert!(prompts[0].contains("Number of Guests: 4"));
}

#[tokio::test]
async fn test_recommend_failure_shows_error_and_hint() {
    let generator = FakeGenerator::failing("API returned 401 Unauthorized");
    let app = app_with(generator.clone());

    let response = app
        .oneshot(form_post("/recommend", "meal_type=Pasta", Some(COOKIE)))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Error getting recommendations: Generation request failed: API returned 401 Unauthorized"));
    assert!(html.contains("Please check your API key and try again."));
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn test_invalid_form_value_warns_without_calling_service() {
    let generator = FakeGenerator::replying("unused");
    let app = app_with(generator.clone());

    let response = app
        .oneshot(form_post("/recommend", "guests=99", Some(COOKIE)))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("notice warning"));
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn test_empty_question_warns_without_calling_service() {
    let generator = FakeGenerator::replying("unused");
    let app = app_with(generator.clone());

    let response = app
        .oneshot(form_post("/ask", "question=+++", Some(COOKIE)))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Please enter a question first."));
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn test_question_is_answered() {
    let generator = FakeGenerator::replying("Serve Chardonnay at 10-13°C.");
    let app = app_with(generator.clone());

    let response = app
        .oneshot(form_post(
            "/ask",
            "question=What+temperature+should+I+serve+Chardonnay%3F",
            Some(COOKIE),
        ))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Sommelier&#39;s Answer"));
    assert!(html.contains("Serve Chardonnay at 10-13°C."));
    assert!(generator.prompts()[0].contains("What temperature should I serve Chardonnay?"));
}

#[tokio::test]
async fn test_question_failure_shows_error_and_hint() {
    let app = app_with(FakeGenerator::failing("timed out"));

    let response = app
        .oneshot(form_post("/ask", "question=Why+tannins%3F", Some(COOKIE)))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Error: Generation request failed: timed out"));
    assert!(html.contains("Please check your API key and try again."));
}

#[tokio::test]
async fn test_browse_search_filters_by_name() {
    let app = app_with(FakeGenerator::replying("unused"));

    let response = app
        .oneshot(get("/?tab=browse&q=MAL", Some(COOKIE)))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("<strong>Malbec Reserve</strong>"));
    assert!(!html.contains("<strong>Chianti Classico</strong>"));
    assert!(!html.contains("<strong>Sancerre</strong>"));
}

#[tokio::test]
async fn test_cart_add_then_clear() {
    let app = app_with(FakeGenerator::replying("unused"));

    let response = app
        .clone()
        .oneshot(form_post("/cart/add", "item=Chianti&tab=browse", Some(COOKIE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/?tab=browse"
    );

    app.clone()
        .oneshot(form_post("/cart/add", "item=Malbec", Some(COOKIE)))
        .await
        .unwrap();

    let html = body_text(app.clone().oneshot(get("/", Some(COOKIE))).await.unwrap()).await;
    let chianti = html.find("<li>Chianti</li>").unwrap();
    let malbec = html.find("<li>Malbec</li>").unwrap();
    assert!(chianti < malbec);

    // Another session does not see this cart.
    let other = body_text(
        app.clone()
            .oneshot(get("/", Some("sommelier_session=someone-else")))
            .await
            .unwrap(),
    )
    .await;
    assert!(other.contains("Your cart is empty"));

    app.clone()
        .oneshot(form_post("/cart/clear", "tab=pairing", Some(COOKIE)))
        .await
        .unwrap();
    let html = body_text(app.oneshot(get("/", Some(COOKIE))).await.unwrap()).await;
    assert!(html.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_learn_more_selects_wine() {
    let app = app_with(FakeGenerator::replying("unused"));

    let response = app
        .clone()
        .oneshot(form_post("/wines/2/select", "", Some(COOKIE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(app.clone().oneshot(get("/?tab=browse", Some(COOKIE))).await.unwrap()).await;
    assert!(html.contains("Selected: Sancerre"));

    let missing = app
        .oneshot(form_post("/wines/99/select", "", Some(COOKIE)))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let app = app_with(FakeGenerator::replying("unused"));
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_end_to_end_with_configured_services() {
    let server = MockServer::start();
    for category in ["reds", "whites", "sparkling"] {
        let path = format!("/wines/{}", category);
        let body = serde_json::json!([
            {"wine": format!("{} one", category), "winery": "W", "location": "L", "rating": {"average": "4.1"}},
            {"wine": format!("{} two", category), "winery": "W", "location": "L"}
        ]);
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        });
    }
    let generation = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-1.5-flash:generateContent")
            .header("x-goog-api-key", "e2e-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Try a Barolo."}]}}]
            }));
    });

    let toml_content = format!(
        "[catalog]\nbase_url = \"{}\"\n\n[generation]\napi_key = \"e2e-key\"\nbase_url = \"{}\"\n",
        server.url("/wines"),
        server.base_url()
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let app = router(AppState::from_config(&config).unwrap());

    let browse = body_text(
        app.clone()
            .oneshot(get("/?tab=browse", Some(COOKIE)))
            .await
            .unwrap(),
    )
    .await;
    assert!(browse.contains("<strong>reds one</strong>"));
    assert!(browse.contains("<strong>sparkling two</strong>"));
    assert!(browse.contains("⭐ Rating: 4.1"));

    let answer = body_text(
        app.oneshot(form_post("/ask", "question=Barolo%3F", Some(COOKIE)))
            .await
            .unwrap(),
    )
    .await;
    generation.assert();
    assert!(answer.contains("Try a Barolo."));
}
